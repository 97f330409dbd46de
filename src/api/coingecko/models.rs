use serde::Deserialize;
use thiserror::Error;

/// Response from GET /coins/bitcoin/market_chart/range
///
/// `prices` is a list of `[millisecond timestamp, price]` pairs sorted
/// ascending by timestamp
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<(f64, f64)>,
}

/// Response from GET /simple/price?ids=bitcoin&vs_currencies=usd
#[derive(Debug, Clone, Deserialize)]
pub struct SimplePriceResponse {
    pub bitcoin: Option<BitcoinQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BitcoinQuote {
    pub usd: Option<f64>,
}

/// Errors from the CoinGecko API. Rate limiting is kept distinguishable from
/// hard failures so callers can choose their fallback policy, even though
/// both currently degrade the same way.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 401/403 - missing or invalid API key
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// 429 Too Many Requests
    #[error("Rate limited, retry after {retry_after_secs} s")]
    RateLimited { retry_after_secs: u64 },
    /// 5xx server error
    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request error: {0}")]
    RequestError(String),
    /// Deserialization error
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    /// 2xx response without a usable price field
    #[error("No price data in response")]
    MissingPrice,
}

impl ApiError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_chart_response_deserializes() {
        let body = r#"{"prices":[[1577836800000.0,7200.17],[1577923200000.0,6985.47]],
                       "market_caps":[],"total_volumes":[]}"#;
        let parsed: MarketChartResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.prices.len(), 2);
        assert_eq!(parsed.prices[0].1, 7200.17);
    }

    #[test]
    fn test_simple_price_response_deserializes() {
        let body = r#"{"bitcoin":{"usd":64350.0}}"#;
        let parsed: SimplePriceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.bitcoin.unwrap().usd, Some(64350.0));
    }

    #[test]
    fn test_simple_price_response_tolerates_missing_fields() {
        let parsed: SimplePriceResponse = serde_json::from_str(r#"{"bitcoin":{}}"#).unwrap();
        assert_eq!(parsed.bitcoin.unwrap().usd, None);

        let parsed: SimplePriceResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.bitcoin.is_none());
    }

    #[test]
    fn test_rate_limited_is_distinguishable() {
        assert!(ApiError::RateLimited { retry_after_secs: 30 }.is_rate_limited());
        assert!(!ApiError::ServerError(500, String::new()).is_rate_limited());
        assert!(!ApiError::MissingPrice.is_rate_limited());
    }
}
