//! Errors surfaced by the chart computation pipeline

use chrono::NaiveDate;
use thiserror::Error;

/// The pipeline's only caller-facing failure; upstream feed problems degrade
/// to snapshot data instead of erroring
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
