//! Structured analysis results and validation of raw model output

use crate::error::{AnalysisError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

/// Directional bias of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl FromStr for Bias {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullish" => Ok(Self::Bullish),
            "bearish" => Ok(Self::Bearish),
            "neutral" => Ok(Self::Neutral),
            other => Err(AnalysisError::SchemaViolation(format!("unknown bias '{other}'"))),
        }
    }
}

/// Role of a price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelType {
    Support,
    Resistance,
    Pivot,
}

impl FromStr for LevelType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "support" => Ok(Self::Support),
            "resistance" => Ok(Self::Resistance),
            "pivot" => Ok(Self::Pivot),
            other => Err(AnalysisError::SchemaViolation(format!(
                "unknown level type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyLevel {
    pub price: f64,
    #[serde(rename = "type")]
    pub level_type: LevelType,
}

impl KeyLevel {
    pub fn new(price: f64, level_type: LevelType) -> Self {
        Self { price, level_type }
    }
}

/// Result returned to callers on both the live and the fallback path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub bias: Bias,
    /// 0 to 100
    pub confidence: u8,
    pub key_levels: Vec<KeyLevel>,
    pub scenarios: Vec<String>,
    pub summary: String,
}

/// Model output before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    bias: String,
    confidence: f64,
    key_levels: Vec<RawKeyLevel>,
    scenarios: Vec<String>,
    summary: String,
}

#[derive(Debug, Deserialize)]
struct RawKeyLevel {
    price: f64,
    #[serde(rename = "type")]
    level_type: String,
}

static CODE_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)^```[A-Za-z]*\s*\n(.*?)\n?```$").ok());

/// Remove a surrounding markdown code fence, if any
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    CODE_FENCE
        .as_ref()
        .and_then(|re| re.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |body| body.as_str().trim())
}

/// Parse and validate raw model output
///
/// Bias and level types are matched case-insensitively. Confidence must be
/// finite and within 0..=100 and is rounded to the nearest integer; prices
/// must be finite.
pub fn parse_analysis(content: &str) -> Result<AnalysisResult> {
    let raw: RawAnalysis = serde_json::from_str(strip_code_fences(content))?;

    let bias = raw.bias.parse()?;

    if !raw.confidence.is_finite() || !(0.0..=100.0).contains(&raw.confidence) {
        return Err(AnalysisError::SchemaViolation(format!(
            "confidence {} out of range",
            raw.confidence
        )));
    }
    let confidence = raw.confidence.round() as u8;

    let key_levels = raw
        .key_levels
        .into_iter()
        .map(|level| {
            if !level.price.is_finite() {
                return Err(AnalysisError::SchemaViolation(
                    "key level price is not finite".to_string(),
                ));
            }
            Ok(KeyLevel::new(level.price, level.level_type.parse()?))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AnalysisResult {
        bias,
        confidence,
        key_levels,
        scenarios: raw.scenarios,
        summary: raw.summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "bias": "Bearish",
        "confidence": 62.6,
        "keyLevels": [
            {"price": 2461.8, "type": "support"},
            {"price": 2500, "type": "RESISTANCE"}
        ],
        "scenarios": ["Rejection at 2500 targets 2460"],
        "summary": "Gold stalls below 2500."
    }"#;

    #[test]
    fn test_parse_valid_output() {
        let result = parse_analysis(VALID).unwrap();
        assert_eq!(result.bias, Bias::Bearish);
        assert_eq!(result.confidence, 63);
        assert_eq!(result.key_levels.len(), 2);
        assert_eq!(result.key_levels[1], KeyLevel::new(2500.0, LevelType::Resistance));
        assert_eq!(result.scenarios.len(), 1);
    }

    #[test]
    fn test_fenced_output() {
        let fenced = format!("```json\n{VALID}\n```");
        assert_eq!(parse_analysis(&fenced).unwrap().bias, Bias::Bearish);

        let bare_fence = format!("```\n{VALID}```");
        assert!(parse_analysis(&bare_fence).is_ok());
    }

    #[test]
    fn test_strip_code_fences_leaves_plain_text() {
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_rejects_schema_violations() {
        let cases = [
            r#"{"bias":"sideways","confidence":50,"keyLevels":[],"scenarios":[],"summary":""}"#,
            r#"{"bias":"neutral","confidence":140,"keyLevels":[],"scenarios":[],"summary":""}"#,
            r#"{"bias":"neutral","confidence":-1,"keyLevels":[],"scenarios":[],"summary":""}"#,
            r#"{"bias":"neutral","confidence":50,"keyLevels":[{"price":1,"type":"target"}],"scenarios":[],"summary":""}"#,
        ];
        for case in cases {
            assert!(
                matches!(parse_analysis(case), Err(AnalysisError::SchemaViolation(_))),
                "accepted: {case}"
            );
        }
    }

    #[test]
    fn test_rejects_malformed_output() {
        for case in [
            "",
            "not json",
            "{}",
            r#"{"bias":"neutral","confidence":"high","keyLevels":[],"scenarios":[],"summary":""}"#,
            r#"{"bias":"neutral","confidence":50,"keyLevels":[{"price":"2500","type":"pivot"}],"scenarios":[],"summary":""}"#,
        ] {
            assert!(
                matches!(parse_analysis(case), Err(AnalysisError::MalformedOutput(_))),
                "accepted: {case}"
            );
        }
    }

    #[test]
    fn test_wire_shape() {
        let result = parse_analysis(VALID).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["bias"], "bearish");
        assert_eq!(json["keyLevels"][1]["type"], "resistance");
        assert_eq!(json["confidence"], 63);
    }
}
