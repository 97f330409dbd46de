use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::{ApiError, MarketChartResponse, SimplePriceResponse};
use crate::models::RawPricePoint;
use crate::utils::ratelimit::rate_limit_coingecko;

/// CoinGecko API client for the live Bitcoin price feed
pub struct CoinGeckoClient {
    http_client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.coingecko.com/api/v3";

    /// Create a new client; the demo API key is optional, the public
    /// endpoints work without one at a lower request budget
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Create a new client with custom base URL (for testing)
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
            api_key,
        }
    }

    /// Read `COINGECKO_API_KEY` from the environment if present
    pub fn from_env() -> Self {
        Self::new(std::env::var("COINGECKO_API_KEY").ok())
    }

    /// Create default headers, attaching the demo API key when configured
    fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| ApiError::RequestError(format!("Invalid API key header: {}", e)))?;
            headers.insert("x-cg-demo-api-key", value);
        }

        Ok(headers)
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            401 | 403 => ApiError::Unauthorized(body_text),
            429 => {
                let retry_after_secs = retry_after.unwrap_or(60);
                warn!("CoinGecko rate limited, retry after {} s", retry_after_secs);
                ApiError::RateLimited { retry_after_secs }
            }
            500..=599 => {
                warn!("CoinGecko server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    /// GET /simple/price
    ///
    /// Fetches the current Bitcoin spot price as a single sample dated today
    /// (UTC). A 2xx response without a price yields `ApiError::MissingPrice`.
    pub async fn get_current_price(&self) -> Result<RawPricePoint, ApiError> {
        rate_limit_coingecko().await;
        let url = format!(
            "{}/simple/price?ids=bitcoin&vs_currencies=usd",
            self.base_url
        );
        let headers = self.create_headers()?;

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let parsed = response
            .json::<SimplePriceResponse>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))?;

        let price = parsed
            .bitcoin
            .and_then(|quote| quote.usd)
            .ok_or(ApiError::MissingPrice)?;

        Ok(RawPricePoint {
            date: Utc::now().date_naive(),
            price,
        })
    }

    /// GET /coins/bitcoin/market_chart/range
    ///
    /// Fetches price samples between `from` and `to` (inclusive calendar
    /// days) and collapses them to one point per calendar date.
    pub async fn get_market_chart_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawPricePoint>, ApiError> {
        rate_limit_coingecko().await;
        let from_ts = from.and_time(NaiveTime::MIN).and_utc().timestamp();
        let to_ts = to.and_time(NaiveTime::MIN).and_utc().timestamp();
        let url = format!(
            "{}/coins/bitcoin/market_chart/range?vs_currency=usd&from={}&to={}",
            self.base_url, from_ts, to_ts
        );
        let headers = self.create_headers()?;

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let parsed = response
            .json::<MarketChartResponse>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))?;

        Ok(samples_to_daily_points(&parsed))
    }
}

/// Collapse millisecond-timestamp samples to one point per calendar date.
/// Samples arrive ascending, so a repeated date overwrites the previous
/// sample (the later one wins).
pub(crate) fn samples_to_daily_points(response: &MarketChartResponse) -> Vec<RawPricePoint> {
    let mut points: Vec<RawPricePoint> = Vec::with_capacity(response.prices.len());
    for &(timestamp_ms, price) in &response.prices {
        let Some(datetime) = DateTime::from_timestamp_millis(timestamp_ms as i64) else {
            debug!("Skipping sample with out-of-range timestamp {}", timestamp_ms);
            continue;
        };
        let date = datetime.date_naive();
        match points.last_mut() {
            Some(last) if last.date == date => last.price = price,
            _ => points.push(RawPricePoint { date, price }),
        }
    }
    points
}
