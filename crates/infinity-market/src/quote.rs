//! Quote type returned by the cascade

use serde::{Deserialize, Serialize};

/// Where a quote came from
///
/// Serializes to the exact label clients display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteSource {
    #[serde(rename = "Alpha Vantage FX")]
    AlphaVantageFx,
    #[serde(rename = "Alpha Vantage Crypto")]
    AlphaVantageCrypto,
    #[serde(rename = "Mock Data (API limit)")]
    MockData,
    #[serde(rename = "Fallback Mock")]
    FallbackMock,
}

impl QuoteSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlphaVantageFx => "Alpha Vantage FX",
            Self::AlphaVantageCrypto => "Alpha Vantage Crypto",
            Self::MockData => "Mock Data (API limit)",
            Self::FallbackMock => "Fallback Mock",
        }
    }

    /// Whether the price came from a live provider
    pub fn is_live(&self) -> bool {
        matches!(self, Self::AlphaVantageFx | Self::AlphaVantageCrypto)
    }
}

impl std::fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A price snapshot for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    /// Always finite
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    /// Provider-native bar time for live quotes, RFC 3339 otherwise
    pub timestamp: String,
    pub source: QuoteSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
