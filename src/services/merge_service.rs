//! Series merge/reconciliation
//!
//! Combines the interval-sampled analytic curve with the daily historical
//! observations into unified chart records. Old dates tolerate a nearest-date
//! match (the curve samples every 30 days on long ranges while observations
//! are daily); the most recent window demands exact same-day observations and
//! drops days without one.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::models::{ChartRecord, HistoricalPoint, PowerLawPoint};
use crate::services::power_law_service::power_law_point_for;

/// Maximum distance (days) a historical observation may sit from an analytic
/// point and still be matched to it
pub const NEAREST_MATCH_TOLERANCE_DAYS: i64 = 15;

/// Span of the trailing window in which only exact same-day matches count
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Exact-date price lookup built from a historical series
pub fn create_price_map(prices: &[HistoricalPoint]) -> HashMap<NaiveDate, f64> {
    prices.iter().map(|p| (p.date, p.price)).collect()
}

/// Closest observation to `target` within the tolerance; on an equidistant
/// tie the first point in series order wins
fn find_nearest_price(target: NaiveDate, prices: &[HistoricalPoint]) -> Option<f64> {
    let mut best: Option<(i64, f64)> = None;
    for point in prices {
        let diff = (point.date - target).num_days().abs();
        match best {
            Some((best_diff, _)) if diff >= best_diff => {}
            _ => best = Some((diff, point.price)),
        }
    }
    match best {
        Some((diff, price)) if diff <= NEAREST_MATCH_TOLERANCE_DAYS => Some(price),
        _ => None,
    }
}

fn chart_record(point: &PowerLawPoint, actual_price: Option<f64>) -> ChartRecord {
    ChartRecord {
        date: point.date,
        timestamp: point.timestamp,
        days: point.days,
        fair_price: point.fair_price,
        support_price: point.support_price,
        resistance_price: point.resistance_price,
        band_base: point.support_price,
        band_width: point.resistance_price - point.support_price,
        actual_price,
    }
}

/// Merge the analytic curve with historical observations.
///
/// Each curve point dated at or before `today` gets the exact-date price, or
/// the nearest observation within the tolerance; future points never carry an
/// actual price.
pub fn merge_data_for_chart(
    power_law: &[PowerLawPoint],
    historical: &[HistoricalPoint],
    today: NaiveDate,
) -> Vec<ChartRecord> {
    let price_map = create_price_map(historical);
    power_law
        .iter()
        .map(|point| {
            let actual_price = if point.date <= today {
                price_map
                    .get(&point.date)
                    .copied()
                    .or_else(|| find_nearest_price(point.date, historical))
            } else {
                None
            };
            chart_record(point, actual_price)
        })
        .collect()
}

/// Stricter merge for the trailing `RECENT_WINDOW_DAYS` window.
///
/// Interval-sampled curve points inside the window are replaced by one point
/// per calendar day, recomputed from the formula for that exact day, and a
/// day is emitted only when a same-day observation exists. Outside the
/// window the tolerant merge applies; future points carry no actual price.
pub fn merge_with_recent_window(
    power_law: &[PowerLawPoint],
    historical: &[HistoricalPoint],
    coefficient: f64,
    exponent: f64,
    today: NaiveDate,
) -> Vec<ChartRecord> {
    if power_law.is_empty() {
        return Vec::new();
    }
    let window_start = today - Duration::days(RECENT_WINDOW_DAYS);

    // In-window interval samples are superseded by the daily pass below
    let out_of_window: Vec<PowerLawPoint> = power_law
        .iter()
        .filter(|p| p.date < window_start || p.date > today)
        .cloned()
        .collect();
    let mut records = merge_data_for_chart(&out_of_window, historical, today);

    // Daily pass over the window, clamped to the curve's span
    let price_map = create_price_map(historical);
    let first_date = power_law[0].date;
    let last_date = power_law[power_law.len() - 1].date;
    let mut day = window_start.max(first_date);
    let window_end = today.min(last_date);
    while day <= window_end {
        if let Some(price) = price_map.get(&day).copied() {
            if let Some(point) = power_law_point_for(day, coefficient, exponent) {
                records.push(chart_record(&point, Some(price)));
            }
        }
        day += Duration::days(1);
    }

    records.sort_by_key(|r| r.date);
    records
}
