//! Power-law curve models

use chrono::NaiveDate;

/// A single sampled point on the power-law fair value curve
#[derive(Debug, Clone, PartialEq)]
pub struct PowerLawPoint {
    pub date: NaiveDate,
    /// Unix timestamp in milliseconds at UTC midnight, for chart x-axes
    pub timestamp: i64,
    /// Whole days since the genesis block, clamped to >= 0
    pub days: i64,
    pub fair_price: f64,
    pub support_price: f64,
    pub resistance_price: f64,
}
