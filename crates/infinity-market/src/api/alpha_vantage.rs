//! Alpha Vantage API client

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::symbol::CurrencyPair;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, instrument};

const PROVIDER: &str = "Alpha Vantage";

/// Series key of the digital-currency endpoint
pub const CRYPTO_SERIES_KEY: &str = "Time Series (Digital Currency Intraday)";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// One upstream series query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesRequest {
    /// `FX_INTRADAY` for a currency pair
    FxIntraday { pair: CurrencyPair, interval: String },
    /// `DIGITAL_CURRENCY_INTRADAY` for a crypto asset
    CryptoIntraday { pair: CurrencyPair },
}

impl SeriesRequest {
    /// Provider function name
    pub fn function(&self) -> &'static str {
        match self {
            Self::FxIntraday { .. } => "FX_INTRADAY",
            Self::CryptoIntraday { .. } => "DIGITAL_CURRENCY_INTRADAY",
        }
    }

    /// Top-level key holding the series in a successful payload
    pub fn series_key(&self) -> String {
        match self {
            Self::FxIntraday { interval, .. } => format!("Time Series FX ({interval})"),
            Self::CryptoIntraday { .. } => CRYPTO_SERIES_KEY.to_string(),
        }
    }

    fn query_params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![("function", self.function().to_string())];
        match self {
            Self::FxIntraday { pair, interval } => {
                params.push(("from_symbol", pair.base.clone()));
                params.push(("to_symbol", pair.quote.clone()));
                params.push(("interval", interval.clone()));
            }
            Self::CryptoIntraday { pair } => {
                params.push(("symbol", pair.base.clone()));
                params.push(("market", pair.quote.clone()));
            }
        }
        params.push(("apikey", api_key.to_string()));
        params
    }
}

/// Upstream seam of the quote cascade
///
/// Returns the decoded payload once it is known not to be a provider error
/// or rate-limit notice.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteTransport: Send + Sync {
    async fn fetch(&self, request: &SeriesRequest) -> Result<Value>;
}

/// Latest bar of a time series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    /// Create a client from configuration
    ///
    /// Every request carries `config.request_timeout`; the per-minute budget
    /// is enforced locally without waiting.
    pub fn new(config: &MarketConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        let quota = Quota::per_minute(
            NonZeroU32::new(config.rate_limit_per_minute).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            client,
            api_key: config.alpha_vantage_api_key.clone(),
            base_url: config.base_url.clone(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }
}

#[async_trait]
impl QuoteTransport for AlphaVantageClient {
    #[instrument(skip(self), fields(function = request.function()))]
    async fn fetch(&self, request: &SeriesRequest) -> Result<Value> {
        if self.rate_limiter.check().is_err() {
            debug!("Local request budget exhausted");
            return Err(MarketError::RateLimitExceeded {
                provider: PROVIDER.to_string(),
            });
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&request.query_params(&self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::HttpStatus {
                provider: PROVIDER.to_string(),
                status: response.status().as_u16(),
            });
        }

        let data: Value = response.json().await?;
        check_payload(&data)?;
        Ok(data)
    }
}

/// Reject provider error and throttling payloads
pub fn check_payload(data: &Value) -> Result<()> {
    if let Some(error) = data.get("Error Message") {
        return Err(MarketError::AlphaVantageError(error.to_string()));
    }

    // The free tier answers throttled calls with a 200 and a notice
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(MarketError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
        });
    }

    Ok(())
}

/// Extract the most recent bar of a series
///
/// The provider lists bars newest first, so the first key wins. Fields that
/// are missing or not numeric come back as `NaN`.
pub fn latest_bar(data: &Value, series_key: &str) -> Result<Bar> {
    let series = data
        .get(series_key)
        .and_then(Value::as_object)
        .ok_or_else(|| MarketError::MissingSeries {
            key: series_key.to_string(),
        })?;

    let (timestamp, values) = series.iter().next().ok_or_else(|| MarketError::MissingSeries {
        key: series_key.to_string(),
    })?;

    Ok(Bar {
        timestamp: timestamp.clone(),
        open: parse_field(values, "1. open"),
        high: parse_field(values, "2. high"),
        low: parse_field(values, "3. low"),
        close: parse_field(values, "4. close"),
    })
}

fn parse_field(values: &Value, field: &str) -> f64 {
    match values.get(field) {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}
