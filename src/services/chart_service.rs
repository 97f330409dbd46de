//! Top-level chart recompute
//!
//! One pure pass from an immutable `ChartConfig` to a fresh `ChartData`:
//! curve generation, merge against the reconciled history, render-budget
//! sampling, then the scalar metrics. Callers replace their previous output
//! wholesale on every parameter change.

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::models::{ChartConfig, ChartData};
use crate::services::history_service::PriceHistorySource;
use crate::services::power_law_service::{
    fair_price_on, generate_power_law_data, EXPONENT_MAX, EXPONENT_MIN,
};
use crate::services::{merge_service, metrics_service, sampling_service};
use crate::utils::errors::ChartError;

/// Render budget for one chart series
pub const MAX_CHART_POINTS: usize = 800;

/// Recompute the chart series for `config`, evaluated at today's date (UTC)
pub fn compute_chart_data(
    config: &ChartConfig,
    history: &PriceHistorySource,
) -> Result<ChartData, ChartError> {
    compute_chart_data_at(config, history, Utc::now().date_naive())
}

/// Recompute the chart series as of an explicit `today`
pub fn compute_chart_data_at(
    config: &ChartConfig,
    history: &PriceHistorySource,
    today: NaiveDate,
) -> Result<ChartData, ChartError> {
    let range = config.date_range;
    if range.end < range.start {
        return Err(ChartError::InvalidRange {
            start: range.start,
            end: range.end,
        });
    }
    if !(EXPONENT_MIN..=EXPONENT_MAX).contains(&config.exponent) {
        warn!(
            "Exponent {} is outside the advisory slider range [{}, {}]",
            config.exponent, EXPONENT_MIN, EXPONENT_MAX
        );
    }

    let power_law = generate_power_law_data(
        range.start,
        range.end,
        config.coefficient,
        config.exponent,
        None,
    );
    let merged = merge_service::merge_with_recent_window(
        &power_law,
        history.points(),
        config.coefficient,
        config.exponent,
        today,
    );
    let records = sampling_service::sample_data_points(&merged, MAX_CHART_POINTS);
    debug!(
        "Chart series computed: {} curve points, {} merged, {} sampled",
        power_law.len(),
        merged.len(),
        records.len()
    );

    Ok(ChartData {
        records,
        current_price: metrics_service::get_latest_price(history.points()),
        current_fair_price: fair_price_on(today, config.coefficient, config.exponent),
        is_using_fallback: history.is_using_fallback(),
    })
}
