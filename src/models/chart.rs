//! Chart output and configuration models

use chrono::NaiveDate;
use serde::Serialize;

use crate::services::power_law_service::{default_date_range, DEFAULT_COEFFICIENT, DEFAULT_EXPONENT};

/// The unified renderable record: power-law curve fields plus the matched
/// actual price (None when no exact/near observation exists or the date is
/// in the future) and the convenience band fields for stacked-area rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    pub date: NaiveDate,
    pub timestamp: i64,
    pub days: i64,
    pub fair_price: f64,
    pub support_price: f64,
    pub resistance_price: f64,
    /// Equal to `support_price`
    pub band_base: f64,
    /// `resistance_price - support_price`
    pub band_width: f64,
    pub actual_price: Option<f64>,
}

/// Requested chart span; `end` is expected to be >= `start`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Immutable input of one chart recompute
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub exponent: f64,
    pub coefficient: f64,
    pub date_range: DateRange,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            exponent: DEFAULT_EXPONENT,
            coefficient: DEFAULT_COEFFICIENT,
            date_range: default_date_range(),
        }
    }
}

/// Output of one chart recompute, handed to the rendering layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub records: Vec<ChartRecord>,
    pub current_price: Option<f64>,
    pub current_fair_price: f64,
    pub is_using_fallback: bool,
}
