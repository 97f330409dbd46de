//! Power-law fair value engine (Giovanni Santostasi model)
//!
//! Everything here is pure: prices come straight from
//! `coefficient * days^exponent` with `days` counted from the genesis block,
//! and the curve generator samples that formula over a date range with an
//! adaptive interval so very long ranges stay cheap to render.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};

use crate::models::{DateRange, PowerLawPoint};

/// Power law default parameters
pub const DEFAULT_EXPONENT: f64 = 5.82;
pub const DEFAULT_COEFFICIENT: f64 = 1.0117e-17;

/// Confidence band multipliers
pub const SUPPORT_MULTIPLIER: f64 = 0.42;
pub const RESISTANCE_MULTIPLIER: f64 = 2.4;

/// Advisory exponent slider bounds; the engine itself does not validate them
pub const EXPONENT_MIN: f64 = 4.0;
pub const EXPONENT_MAX: f64 = 7.0;

/// Range-span thresholds (in days) for adaptive curve sampling
pub const INTERVAL_MONTHLY_DAYS: i64 = 365 * 20;
pub const INTERVAL_BIWEEKLY_DAYS: i64 = 365 * 10;
pub const INTERVAL_WEEKLY_DAYS: i64 = 365 * 5;
pub const INTERVAL_EVERY_3_DAYS: i64 = 365;

/// Bitcoin genesis block date - January 3, 2009 (UTC)
pub fn genesis_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2009, 1, 3).expect("valid genesis date")
}

/// Default chart span: genesis through end of 2040
pub fn default_date_range() -> DateRange {
    DateRange {
        start: genesis_date(),
        end: NaiveDate::from_ymd_opt(2040, 12, 31).expect("valid default end date"),
    }
}

/// Whole days between `date` and the genesis block, clamped to >= 0
pub fn days_since_genesis(date: NaiveDate) -> i64 {
    (date - genesis_date()).num_days().max(0)
}

/// Model price for a given day-offset; 0 for any day at or before genesis
pub fn calculate_power_law_price(days: i64, coefficient: f64, exponent: f64) -> f64 {
    if days <= 0 {
        return 0.0;
    }
    coefficient * (days as f64).powf(exponent)
}

pub fn calculate_support_price(fair_price: f64) -> f64 {
    fair_price * SUPPORT_MULTIPLIER
}

pub fn calculate_resistance_price(fair_price: f64) -> f64 {
    fair_price * RESISTANCE_MULTIPLIER
}

/// Sampling interval for a range span: wider ranges sample sparser
pub fn calculate_optimal_interval(start: NaiveDate, end: NaiveDate) -> i64 {
    let span_days = (end - start).num_days();
    if span_days > INTERVAL_MONTHLY_DAYS {
        30
    } else if span_days > INTERVAL_BIWEEKLY_DAYS {
        14
    } else if span_days > INTERVAL_WEEKLY_DAYS {
        7
    } else if span_days > INTERVAL_EVERY_3_DAYS {
        3
    } else {
        1
    }
}

pub(crate) fn timestamp_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Curve point for an exact calendar date; None at or before genesis
pub fn power_law_point_for(
    date: NaiveDate,
    coefficient: f64,
    exponent: f64,
) -> Option<PowerLawPoint> {
    let days = days_since_genesis(date);
    if days <= 0 {
        return None;
    }
    let fair_price = calculate_power_law_price(days, coefficient, exponent);
    Some(PowerLawPoint {
        date,
        timestamp: timestamp_millis(date),
        days,
        fair_price,
        support_price: calculate_support_price(fair_price),
        resistance_price: calculate_resistance_price(fair_price),
    })
}

/// Lazily computed curve over a date range.
///
/// Walks from `start` to `end` in `interval`-day strides, skipping dates at
/// or before genesis, and always closes with a point dated exactly `end`
/// even when the stride overshoots it. Restartable by cloning.
#[derive(Debug, Clone)]
pub struct PowerLawCurve {
    current: NaiveDate,
    end: NaiveDate,
    interval: i64,
    coefficient: f64,
    exponent: f64,
    end_emitted: bool,
}

impl PowerLawCurve {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        coefficient: f64,
        exponent: f64,
        interval_days: Option<i64>,
    ) -> Self {
        let interval = interval_days
            .unwrap_or_else(|| calculate_optimal_interval(start, end))
            .max(1);
        Self {
            current: start,
            end,
            interval,
            coefficient,
            exponent,
            // An inverted range produces nothing, terminal point included
            end_emitted: start > end,
        }
    }
}

impl Iterator for PowerLawCurve {
    type Item = PowerLawPoint;

    fn next(&mut self) -> Option<PowerLawPoint> {
        while self.current <= self.end {
            let date = self.current;
            self.current += Duration::days(self.interval);
            if date == self.end {
                self.end_emitted = true;
            }
            if let Some(point) = power_law_point_for(date, self.coefficient, self.exponent) {
                return Some(point);
            }
        }
        if !self.end_emitted {
            self.end_emitted = true;
            return power_law_point_for(self.end, self.coefficient, self.exponent);
        }
        None
    }
}

/// Sample the analytic curve from `start` to `end` inclusive
pub fn generate_power_law_data(
    start: NaiveDate,
    end: NaiveDate,
    coefficient: f64,
    exponent: f64,
    interval_days: Option<i64>,
) -> Vec<PowerLawPoint> {
    PowerLawCurve::new(start, end, coefficient, exponent, interval_days).collect()
}

/// Model price for a specific calendar date
pub fn fair_price_on(date: NaiveDate, coefficient: f64, exponent: f64) -> f64 {
    calculate_power_law_price(days_since_genesis(date), coefficient, exponent)
}

/// Model price for today (UTC)
pub fn get_current_fair_price(coefficient: f64, exponent: f64) -> f64 {
    fair_price_on(Utc::now().date_naive(), coefficient, exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_price_is_zero_at_or_before_genesis() {
        assert_eq!(calculate_power_law_price(0, DEFAULT_COEFFICIENT, DEFAULT_EXPONENT), 0.0);
        assert_eq!(calculate_power_law_price(-50, DEFAULT_COEFFICIENT, DEFAULT_EXPONENT), 0.0);
    }

    #[test]
    fn test_price_matches_golden_reference() {
        // Regression anchor: 1.0117e-17 * 5000^5.82
        let price = calculate_power_law_price(5000, 1.0117e-17, 5.82);
        assert!(
            (price - 34_125.0).abs() < 500.0,
            "golden anchor drifted: {}",
            price
        );
    }

    #[test]
    fn test_price_strictly_increasing_in_days() {
        let mut previous = 0.0;
        for days in [1, 10, 100, 1000, 5000, 10000] {
            let price = calculate_power_law_price(days, DEFAULT_COEFFICIENT, DEFAULT_EXPONENT);
            assert!(price > previous, "not increasing at days={}", days);
            previous = price;
        }
    }

    #[test]
    fn test_price_strictly_increasing_in_exponent() {
        let mut previous = 0.0;
        for exponent in [4.0, 4.5, 5.0, 5.82, 6.5, 7.0] {
            let price = calculate_power_law_price(5000, DEFAULT_COEFFICIENT, exponent);
            assert!(price > previous, "not increasing at exponent={}", exponent);
            previous = price;
        }
    }

    #[test]
    fn test_band_ordering() {
        for fair in [0.0, 0.5, 100.0, 75_000.0] {
            let support = calculate_support_price(fair);
            let resistance = calculate_resistance_price(fair);
            assert!(support <= fair && fair <= resistance);
        }
    }

    #[test]
    fn test_days_since_genesis_clamps_pre_genesis_dates() {
        assert_eq!(days_since_genesis(date(2008, 12, 1)), 0);
        assert_eq!(days_since_genesis(genesis_date()), 0);
        assert_eq!(days_since_genesis(date(2009, 1, 4)), 1);
    }

    #[test]
    fn test_optimal_interval_buckets() {
        let start = date(2010, 1, 1);
        assert_eq!(calculate_optimal_interval(start, date(2035, 1, 1)), 30);
        assert_eq!(calculate_optimal_interval(start, date(2022, 1, 1)), 14);
        assert_eq!(calculate_optimal_interval(start, date(2016, 1, 1)), 7);
        assert_eq!(calculate_optimal_interval(start, date(2012, 1, 1)), 3);
        assert_eq!(calculate_optimal_interval(start, date(2010, 6, 1)), 1);
    }

    #[test]
    fn test_curve_always_includes_end_date() {
        // 30-day stride over a >20y range does not land on the end date
        let start = date(2010, 1, 1);
        let end = date(2040, 12, 31);
        let points = generate_power_law_data(start, end, DEFAULT_COEFFICIENT, DEFAULT_EXPONENT, None);
        assert_eq!(points.first().unwrap().date, start);
        assert_eq!(points.last().unwrap().date, end);
        // Terminal point appears exactly once
        let end_points = points.iter().filter(|p| p.date == end).count();
        assert_eq!(end_points, 1);
    }

    #[test]
    fn test_curve_skips_pre_genesis_points() {
        let points = generate_power_law_data(
            date(2008, 12, 1),
            date(2009, 3, 1),
            DEFAULT_COEFFICIENT,
            DEFAULT_EXPONENT,
            Some(1),
        );
        assert!(!points.is_empty());
        assert!(points.iter().all(|p| p.days > 0));
        assert_eq!(points.first().unwrap().date, date(2009, 1, 4));
    }

    #[test]
    fn test_curve_respects_interval_override() {
        let points = generate_power_law_data(
            date(2020, 1, 1),
            date(2020, 1, 31),
            DEFAULT_COEFFICIENT,
            DEFAULT_EXPONENT,
            Some(10),
        );
        let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2020, 1, 1),
                date(2020, 1, 11),
                date(2020, 1, 21),
                date(2020, 1, 31),
            ]
        );
    }

    #[test]
    fn test_curve_is_restartable() {
        let curve = PowerLawCurve::new(
            date(2020, 1, 1),
            date(2021, 1, 1),
            DEFAULT_COEFFICIENT,
            DEFAULT_EXPONENT,
            None,
        );
        let first: Vec<PowerLawPoint> = curve.clone().collect();
        let second: Vec<PowerLawPoint> = curve.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_inverted_range_yields_empty_curve() {
        let points = generate_power_law_data(
            date(2021, 1, 1),
            date(2020, 1, 1),
            DEFAULT_COEFFICIENT,
            DEFAULT_EXPONENT,
            None,
        );
        assert!(points.is_empty());
    }

    #[test]
    fn test_fully_pre_genesis_range_yields_empty_curve() {
        let points = generate_power_law_data(
            date(2007, 1, 1),
            date(2008, 1, 1),
            DEFAULT_COEFFICIENT,
            DEFAULT_EXPONENT,
            None,
        );
        assert!(points.is_empty());
    }
}
