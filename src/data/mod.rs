//! Bundled historical price snapshot
//!
//! Monthly Bitcoin closes shipped with the binary as the always-available
//! floor under the live feed. Read-only; parsed once on first access.

use lazy_static::lazy_static;

use crate::models::HistoricalData;

const SNAPSHOT_JSON: &str = include_str!("bitcoin_historical.json");

lazy_static! {
    static ref SNAPSHOT: HistoricalData =
        serde_json::from_str(SNAPSHOT_JSON).expect("bundled snapshot is valid JSON");
}

pub fn bundled_snapshot() -> &'static HistoricalData {
    &SNAPSHOT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_parses_and_is_well_formed() {
        let snapshot = bundled_snapshot();
        assert_eq!(snapshot.metadata.currency, "USD");
        assert!(snapshot.prices.len() > 100);
        assert!(snapshot.prices.iter().all(|p| p.price > 0.0));
    }

    #[test]
    fn test_snapshot_is_sorted_ascending_with_unique_dates() {
        let prices = &bundled_snapshot().prices;
        assert!(prices.windows(2).all(|w| w[0].date < w[1].date));
    }
}
