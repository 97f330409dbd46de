//! Data models for the power-law chart pipeline
//!
//! Each model represents either a wire/snapshot payload or a record flowing
//! between the pipeline services.

pub mod chart;
pub mod historical;
pub mod power_law;

// Re-export commonly used types for convenience
pub use chart::{ChartConfig, ChartData, ChartRecord, DateRange};
pub use historical::{HistoricalData, HistoricalPoint, RawPricePoint, SnapshotMetadata};
pub use power_law::PowerLawPoint;
