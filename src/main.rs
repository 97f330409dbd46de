use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod data;
mod models;
mod services;
mod utils;

use api::coingecko::CoinGeckoClient;
use models::ChartConfig;
use services::chart_service;
use services::history_service::PriceHistorySource;
use services::metrics_service::calculate_deviation;
use services::power_law_service::get_current_fair_price;
use utils::format::format_price;

/// Build the chart configuration from defaults plus optional env overrides
fn config_from_env() -> ChartConfig {
    let mut config = ChartConfig::default();

    if let Ok(value) = std::env::var("POWERLAW_EXPONENT") {
        match value.parse() {
            Ok(parsed) => config.exponent = parsed,
            Err(_) => warn!("Ignoring invalid POWERLAW_EXPONENT '{}'", value),
        }
    }
    if let Ok(value) = std::env::var("POWERLAW_COEFFICIENT") {
        match value.parse() {
            Ok(parsed) => config.coefficient = parsed,
            Err(_) => warn!("Ignoring invalid POWERLAW_COEFFICIENT '{}'", value),
        }
    }
    if let Ok(value) = std::env::var("CHART_START") {
        match value.parse() {
            Ok(parsed) => config.date_range.start = parsed,
            Err(_) => warn!("Ignoring invalid CHART_START '{}'", value),
        }
    }
    if let Ok(value) = std::env::var("CHART_END") {
        match value.parse() {
            Ok(parsed) => config.date_range.end = parsed,
            Err(_) => warn!("Ignoring invalid CHART_END '{}'", value),
        }
    }

    config
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("btc_powerlaw=debug".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .with_target(true)
        .init();

    info!("Starting btc-powerlaw chart data engine...");

    let snapshot = data::bundled_snapshot();
    info!(
        "Loaded bundled snapshot: {} points (updated {})",
        snapshot.prices.len(),
        snapshot.metadata.last_updated
    );

    let client = CoinGeckoClient::from_env();
    let mut history = PriceHistorySource::from_snapshot(&snapshot.prices);
    history.refresh(&client).await;
    if history.is_using_fallback() {
        warn!("Live feed unavailable - using cached snapshot data");
    }

    match client.get_current_price().await {
        Ok(sample) => info!("Live spot price: {}", format_price(sample.price)),
        Err(e) if e.is_rate_limited() => warn!("Spot price fetch rate limited: {}", e),
        Err(e) => warn!("Spot price fetch failed: {}", e),
    }

    let config = config_from_env();
    let chart_data = match chart_service::compute_chart_data(&config, &history) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to compute chart data: {}", e);
            return;
        }
    };

    info!(
        "Fair price today: {}",
        format_price(get_current_fair_price(config.coefficient, config.exponent))
    );
    if let Some(price) = chart_data.current_price {
        info!(
            "Latest price: {} ({:+.1}% vs fair value)",
            format_price(price),
            calculate_deviation(price, chart_data.current_fair_price)
        );
    }
    info!("Chart series: {} records", chart_data.records.len());

    // Emit the full series for the rendering layer
    match serde_json::to_string(&chart_data) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize chart data: {}", e),
    }
}
