//! Historical price models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observed price as delivered by the snapshot file or the live feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Provenance block of the bundled snapshot file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub last_updated: String,
    pub source: String,
    pub currency: String,
}

/// The bundled snapshot file: metadata plus prices sorted ascending by date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalData {
    pub metadata: SnapshotMetadata,
    pub prices: Vec<RawPricePoint>,
}

/// An observed price enriched with its day-offset from genesis
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub days_since_genesis: i64,
}
