//! Price display formatting

/// Format a USD price with magnitude-bucketed precision
pub fn format_price(price: f64) -> String {
    if price >= 1_000_000.0 {
        format!("${:.2}M", price / 1_000_000.0)
    } else if price >= 1_000.0 {
        format!("${:.1}K", price / 1_000.0)
    } else if price >= 1.0 {
        format!("${:.2}", price)
    } else if price >= 0.01 {
        format!("${:.4}", price)
    } else {
        format!("${:.2e}", price)
    }
}
