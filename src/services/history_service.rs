//! Historical price source
//!
//! Supplies the best-available date -> price series: the bundled snapshot is
//! the always-available floor, and a live CoinGecko refresh is merged over it
//! when it succeeds. Any upstream failure degrades silently to snapshot-only
//! data with the fallback flag set; nothing here is fatal to the caller.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::api::coingecko::{ApiError, CoinGeckoClient};
use crate::models::{HistoricalPoint, RawPricePoint};
use crate::services::power_law_service::days_since_genesis;

/// Attach day-offsets to raw feed/snapshot points
pub fn transform_raw_prices(prices: &[RawPricePoint]) -> Vec<HistoricalPoint> {
    prices
        .iter()
        .map(|p| HistoricalPoint {
            date: p.date,
            price: p.price,
            days_since_genesis: days_since_genesis(p.date),
        })
        .collect()
}

/// Merge live points over the baseline: one point per calendar date,
/// ascending, with the later-inserted source winning on a shared date
pub fn merge_historical(
    baseline: &[HistoricalPoint],
    live: &[HistoricalPoint],
) -> Vec<HistoricalPoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for point in baseline.iter().chain(live) {
        by_date.insert(point.date, point.price);
    }
    by_date
        .into_iter()
        .map(|(date, price)| HistoricalPoint {
            date,
            price,
            days_since_genesis: days_since_genesis(date),
        })
        .collect()
}

/// Snapshot-plus-live price series with graceful degradation.
///
/// Refreshes are numbered so that a response belonging to a superseded
/// request can never overwrite state produced by a later one (last request
/// wins).
pub struct PriceHistorySource {
    snapshot: Vec<HistoricalPoint>,
    merged: Vec<HistoricalPoint>,
    is_using_fallback: bool,
    latest_refresh: u64,
}

impl PriceHistorySource {
    /// Start from the bundled snapshot; fallback until a live refresh lands
    pub fn from_snapshot(raw: &[RawPricePoint]) -> Self {
        let snapshot = transform_raw_prices(raw);
        Self {
            merged: snapshot.clone(),
            snapshot,
            is_using_fallback: true,
            latest_refresh: 0,
        }
    }

    /// The reconciled series, ascending by date
    pub fn points(&self) -> &[HistoricalPoint] {
        &self.merged
    }

    pub fn is_using_fallback(&self) -> bool {
        self.is_using_fallback
    }

    /// Issue a new refresh id, superseding any refresh still in flight
    pub fn begin_refresh(&mut self) -> u64 {
        self.latest_refresh += 1;
        self.latest_refresh
    }

    /// Apply the outcome of refresh `refresh_id`. Stale outcomes are
    /// discarded; returns whether the outcome was applied.
    pub fn apply_refresh(
        &mut self,
        refresh_id: u64,
        outcome: Result<Vec<RawPricePoint>, ApiError>,
    ) -> bool {
        if refresh_id != self.latest_refresh {
            debug!(
                "Discarding stale refresh {} (latest is {})",
                refresh_id, self.latest_refresh
            );
            return false;
        }
        match outcome {
            Ok(prices) => {
                let live = transform_raw_prices(&prices);
                self.merged = merge_historical(&self.snapshot, &live);
                self.is_using_fallback = false;
                info!(
                    "Live refresh applied: {} live points, {} merged",
                    live.len(),
                    self.merged.len()
                );
            }
            Err(e) if e.is_rate_limited() => {
                warn!("Live feed rate limited, using cached snapshot data: {}", e);
                self.merged = self.snapshot.clone();
                self.is_using_fallback = true;
            }
            Err(e) => {
                warn!("Live feed unavailable, using cached snapshot data: {}", e);
                self.merged = self.snapshot.clone();
                self.is_using_fallback = true;
            }
        }
        true
    }

    /// Fetch the live range (snapshot start through today) and apply it
    pub async fn refresh(&mut self, client: &CoinGeckoClient) {
        let refresh_id = self.begin_refresh();
        let from = self
            .snapshot
            .first()
            .map(|p| p.date)
            .unwrap_or_else(crate::services::power_law_service::genesis_date);
        let today = Utc::now().date_naive();
        let outcome = client.get_market_chart_range(from, today).await;
        self.apply_refresh(refresh_id, outcome);
    }
}
