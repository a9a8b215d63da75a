//! Fibonacci retracement levels

use std::collections::BTreeMap;

/// Retracement ratios, in ascending order
pub const RETRACEMENT_RATIOS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];

/// Level label (the ratio as written, e.g. `"0.618"`) to price
///
/// Labels of the standard ratios sort lexically in ratio order.
pub type FibonacciLevels = BTreeMap<String, f64>;

/// Label under which a ratio is reported
pub fn level_label(ratio: f64) -> String {
    ratio.to_string()
}

/// Compute `low + (high - low) * ratio` for every standard ratio
///
/// `high < low` is accepted as-is; the levels then descend.
pub fn retracement_levels(high: f64, low: f64) -> FibonacciLevels {
    let diff = high - low;
    RETRACEMENT_RATIOS
        .iter()
        .map(|&ratio| (level_label(ratio), low + diff * ratio))
        .collect()
}

/// Parse a swing input as a usable price
///
/// Zero, blank, non-numeric and non-finite inputs are rejected.
pub fn parse_swing(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v != 0.0)
}
