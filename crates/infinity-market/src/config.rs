//! Configuration for market data operations

use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Key Alpha Vantage accepts without registration (heavily limited)
pub const DEMO_API_KEY: &str = "demo";

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

const RATE_LIMIT_ENV: &str = "ALPHA_VANTAGE_RATE_LIMIT";
const TIMEOUT_ENV: &str = "ALPHA_VANTAGE_TIMEOUT_SECS";

/// Configuration for the quote cascade and its upstream client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Alpha Vantage API key (`demo` when none is configured)
    pub alpha_vantage_api_key: String,

    /// Query endpoint of the provider
    pub base_url: String,

    /// Bar interval used for the FX intraday series
    pub fx_interval: String,

    /// Timeout applied to every upstream round trip
    pub request_timeout: Duration,

    /// Local request budget per minute
    pub rate_limit_per_minute: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: DEMO_API_KEY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            fx_interval: "5min".to_string(),
            request_timeout: Duration::from_secs(10),
            rate_limit_per_minute: 5, // free tier
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Build from the environment
    ///
    /// Reads `ALPHA_VANTAGE_KEY`, falling back to `ALPHA_VANTAGE_API_KEY`,
    /// then to the `demo` key. `ALPHA_VANTAGE_RATE_LIMIT` (requests per
    /// minute) and `ALPHA_VANTAGE_TIMEOUT_SECS` override the free-tier limits.
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env_api_key().with_env_limits()?.build()
    }

    /// Whether the shared demo key is in use
    pub fn uses_demo_key(&self) -> bool {
        self.alpha_vantage_api_key == DEMO_API_KEY
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.alpha_vantage_api_key.trim().is_empty() {
            return Err(MarketError::ConfigError(
                "Alpha Vantage API key must not be blank".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(MarketError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit_per_minute == 0 {
            return Err(MarketError::ConfigError(
                "rate_limit_per_minute must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn api_key_from_env() -> Option<String> {
    ["ALPHA_VANTAGE_KEY", "ALPHA_VANTAGE_API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

fn parse_env_number<T>(name: &str, raw: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|e| MarketError::ConfigError(format!("{name}={raw:?}: {e}")))
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    alpha_vantage_api_key: Option<String>,
    base_url: Option<String>,
    fx_interval: Option<String>,
    request_timeout: Option<Duration>,
    rate_limit_per_minute: Option<u32>,
}

impl MarketConfigBuilder {
    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Load Alpha Vantage API key from environment, if present
    pub fn with_env_api_key(mut self) -> Self {
        if let Some(key) = api_key_from_env() {
            self.alpha_vantage_api_key = Some(key);
        }
        self
    }

    /// Load the request budget and timeout from the environment, if present
    pub fn with_env_limits(mut self) -> Result<Self> {
        let limit = parse_env_number(RATE_LIMIT_ENV, std::env::var(RATE_LIMIT_ENV).ok())?;
        if let Some(limit) = limit {
            self.rate_limit_per_minute = Some(limit);
        }

        let timeout = parse_env_number::<u64>(TIMEOUT_ENV, std::env::var(TIMEOUT_ENV).ok())?;
        if let Some(secs) = timeout {
            self.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(self)
    }

    /// Set the provider endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the FX bar interval
    pub fn fx_interval(mut self, interval: impl Into<String>) -> Self {
        self.fx_interval = Some(interval.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the local request budget per minute
    pub fn rate_limit_per_minute(mut self, limit: u32) -> Self {
        self.rate_limit_per_minute = Some(limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let config = MarketConfig {
            alpha_vantage_api_key: self
                .alpha_vantage_api_key
                .unwrap_or(defaults.alpha_vantage_api_key),
            base_url: self.base_url.unwrap_or(defaults.base_url),
            fx_interval: self.fx_interval.unwrap_or(defaults.fx_interval),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            rate_limit_per_minute: self
                .rate_limit_per_minute
                .unwrap_or(defaults.rate_limit_per_minute),
        };

        config.validate()?;
        Ok(config)
    }
}
