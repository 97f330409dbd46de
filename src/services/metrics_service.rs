//! Derived scalar metrics

use crate::models::HistoricalPoint;

/// Percent deviation of the actual price from the fair price; defined as 0
/// when the fair price is 0 rather than dividing by zero
pub fn calculate_deviation(actual_price: f64, fair_price: f64) -> f64 {
    if fair_price == 0.0 {
        return 0.0;
    }
    (actual_price - fair_price) / fair_price * 100.0
}

/// Price of the chronologically last observation, if any
pub fn get_latest_price(prices: &[HistoricalPoint]) -> Option<f64> {
    prices.iter().max_by_key(|p| p.date).map(|p| p.price)
}
