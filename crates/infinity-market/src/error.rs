//! Error types for market data operations

use thiserror::Error;

/// Market data specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// Provider answered with a non-success HTTP status
    #[error("HTTP error from {provider}: {status}")]
    HttpStatus { provider: String, status: u16 },

    /// Rate limit exceeded, either locally or reported by the provider
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// Provider returned a well-formed error payload
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// Payload parsed but the expected time series is absent
    #[error("Missing time series '{key}' in provider response")]
    MissingSeries { key: String },

    /// Series present but its latest bar has no usable close price
    #[error("No usable price in series '{key}'")]
    NoPrice { key: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl MarketError {
    /// Whether the failure happened below the payload level
    ///
    /// Transport failures abort the whole cascade; payload failures only
    /// skip to the next tier.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::JsonError(_))
    }
}

/// Result type alias for market data operations
pub type Result<T> = std::result::Result<T, MarketError>;
