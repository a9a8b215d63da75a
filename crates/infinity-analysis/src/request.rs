//! Analysis requests and the prompt builder

use crate::fibonacci::{FibonacciLevels, parse_swing, retracement_levels};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SYMBOL: &str = "XAUUSD";
pub const DEFAULT_TIMEFRAME: &str = "H1";

fn default_symbol() -> String {
    DEFAULT_SYMBOL.to_string()
}

fn default_timeframe() -> String {
    DEFAULT_TIMEFRAME.to_string()
}

/// What the analysis client is asked to analyze
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default)]
    pub fib_levels: FibonacciLevels,
    /// Free-text instruction, may be empty
    #[serde(default)]
    pub prompt: String,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            timeframe: default_timeframe(),
            fib_levels: FibonacciLevels::new(),
            prompt: String::new(),
        }
    }
}

/// Prompt used when the caller does not write one
pub fn default_prompt(symbol: &str) -> String {
    format!("Analyze {symbol} market conditions")
}

/// Assemble an analysis request from raw user input
///
/// Levels are computed only when both swings parse as non-zero finite
/// numbers; otherwise the level set is empty. A blank prompt is replaced by
/// [`default_prompt`].
pub fn build_request(
    symbol: &str,
    timeframe: &str,
    swing_high: Option<&str>,
    swing_low: Option<&str>,
    user_prompt: Option<&str>,
) -> AnalysisRequest {
    let fib_levels = match (swing_high.and_then(parse_swing), swing_low.and_then(parse_swing)) {
        (Some(high), Some(low)) => retracement_levels(high, low),
        _ => FibonacciLevels::new(),
    };

    let prompt = user_prompt
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map_or_else(|| default_prompt(symbol), str::to_string);

    AnalysisRequest {
        symbol: symbol.to_string(),
        timeframe: timeframe.to_string(),
        fib_levels,
        prompt,
    }
}
