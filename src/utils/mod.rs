pub mod errors;
pub mod format;
pub mod ratelimit;

pub use errors::ChartError;
pub use format::format_price;
pub use ratelimit::rate_limit_coingecko;
