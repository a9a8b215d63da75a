//! Quote provider cascade
//!
//! Tiers are tried in preference order, one at a time:
//!
//! 1. FX intraday series for the resolved pair
//! 2. Digital-currency intraday series, for crypto symbols only
//! 3. Static reference price (`Mock Data (API limit)`)
//!
//! A transport failure at any tier abandons the cascade and yields the
//! last-resort `Fallback Mock` quote. `get_quote` itself cannot fail.

use crate::api::alpha_vantage::{AlphaVantageClient, Bar, QuoteTransport, SeriesRequest, latest_bar};
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::quote::{Quote, QuoteSource};
use crate::reference::{MOCK_NOTE, fallback_price, reference_price};
use crate::symbol::{is_crypto, resolve};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Resolves symbols into quotes, degrading instead of failing
#[derive(Clone)]
pub struct QuoteCascade {
    transport: Arc<dyn QuoteTransport>,
    fx_interval: String,
}

impl QuoteCascade {
    /// Create a cascade over an arbitrary transport
    pub fn new(transport: Arc<dyn QuoteTransport>, config: &MarketConfig) -> Self {
        Self {
            transport,
            fx_interval: config.fx_interval.clone(),
        }
    }

    /// Create a cascade backed by the Alpha Vantage client
    pub fn from_config(config: &MarketConfig) -> Result<Self> {
        let client = AlphaVantageClient::new(config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Get a quote for `symbol`
    #[instrument(skip(self))]
    pub async fn get_quote(&self, symbol: &str) -> Quote {
        match self.query_providers(symbol).await {
            Ok(Some(quote)) => {
                info!(source = %quote.source, price = quote.price, "Live quote");
                quote
            }
            Ok(None) => {
                warn!("No provider returned a usable series, using reference price");
                mock_quote(symbol)
            }
            Err(e) => {
                warn!(error = %e, "Quote cascade aborted, using fallback price");
                fallback_quote(symbol)
            }
        }
    }

    async fn query_providers(&self, symbol: &str) -> Result<Option<Quote>> {
        let pair = resolve(symbol);

        let fx = SeriesRequest::FxIntraday {
            pair: pair.clone(),
            interval: self.fx_interval.clone(),
        };
        if let Some(quote) = self.try_tier(symbol, &fx, QuoteSource::AlphaVantageFx).await? {
            return Ok(Some(quote));
        }

        if is_crypto(symbol) {
            let crypto = SeriesRequest::CryptoIntraday { pair };
            if let Some(quote) = self
                .try_tier(symbol, &crypto, QuoteSource::AlphaVantageCrypto)
                .await?
            {
                return Ok(Some(quote));
            }
        }

        Ok(None)
    }

    /// Run one tier; payload problems become `None`, transport errors propagate
    async fn try_tier(
        &self,
        symbol: &str,
        request: &SeriesRequest,
        source: QuoteSource,
    ) -> Result<Option<Quote>> {
        let outcome = match self.transport.fetch(request).await {
            Ok(data) => latest_bar(&data, &request.series_key())
                .and_then(|bar| quote_from_bar(symbol, bar, source, &request.series_key())),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(quote) => Ok(Some(quote)),
            Err(e) if e.is_transport() => Err(e),
            Err(e) => {
                debug!(function = request.function(), reason = %e, "Tier unusable");
                Ok(None)
            }
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn quote_from_bar(symbol: &str, bar: Bar, source: QuoteSource, series_key: &str) -> Result<Quote> {
    let price = finite(bar.close).ok_or_else(|| MarketError::NoPrice {
        key: series_key.to_string(),
    })?;

    Ok(Quote {
        symbol: symbol.to_string(),
        price,
        open: finite(bar.open),
        high: finite(bar.high),
        low: finite(bar.low),
        timestamp: bar.timestamp,
        source,
        note: None,
    })
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reference-price quote for the rate-limited tier
pub fn mock_quote(symbol: &str) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        price: reference_price(symbol),
        open: None,
        high: None,
        low: None,
        timestamp: now_iso(),
        source: QuoteSource::MockData,
        note: Some(MOCK_NOTE.to_string()),
    }
}

/// Last-resort quote when the cascade itself broke down
pub fn fallback_quote(symbol: &str) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        price: fallback_price(symbol),
        open: None,
        high: None,
        low: None,
        timestamp: now_iso(),
        source: QuoteSource::FallbackMock,
        note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::alpha_vantage::MockQuoteTransport;
    use mockall::predicate::function;
    use serde_json::{Value, json};

    fn cascade(mock: MockQuoteTransport) -> QuoteCascade {
        QuoteCascade::new(Arc::new(mock), &MarketConfig::default())
    }

    fn fx_payload(close: &str) -> Value {
        json!({
            "Meta Data": { "1. Information": "FX Intraday (5min) Time Series" },
            "Time Series FX (5min)": {
                "2024-05-01 16:55:00": {
                    "1. open": "2480.10", "2. high": "2491.00", "3. low": "2478.25", "4. close": close
                },
                "2024-05-01 16:50:00": {
                    "1. open": "2470.00", "2. high": "2481.00", "3. low": "2469.00", "4. close": "2480.10"
                }
            }
        })
    }

    fn rate_limited() -> Result<Value> {
        Err(MarketError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        })
    }

    fn transport_failure() -> Result<Value> {
        let err = serde_json::from_str::<Value>("<!doctype html>").unwrap_err();
        Err(MarketError::JsonError(err))
    }

    fn is_fx(request: &SeriesRequest) -> bool {
        matches!(request, SeriesRequest::FxIntraday { .. })
    }

    #[tokio::test]
    async fn test_fx_tier_success() {
        let mut mock = MockQuoteTransport::new();
        mock.expect_fetch()
            .with(function(|r: &SeriesRequest| {
                *r == SeriesRequest::FxIntraday {
                    pair: resolve("XAUUSD"),
                    interval: "5min".to_string(),
                }
            }))
            .times(1)
            .returning(|_| Ok(fx_payload("2490.55")));

        let quote = cascade(mock).get_quote("XAUUSD").await;
        assert_eq!(quote.source, QuoteSource::AlphaVantageFx);
        assert_eq!(quote.price, 2490.55);
        assert_eq!(quote.open, Some(2480.10));
        assert_eq!(quote.high, Some(2491.00));
        assert_eq!(quote.low, Some(2478.25));
        assert_eq!(quote.timestamp, "2024-05-01 16:55:00");
        assert_eq!(quote.note, None);
    }

    #[tokio::test]
    async fn test_crypto_tier_after_fx_miss() {
        let mut mock = MockQuoteTransport::new();
        mock.expect_fetch()
            .with(function(is_fx))
            .times(1)
            .returning(|_| Ok(json!({ "Meta Data": {} })));
        mock.expect_fetch()
            .with(function(|r: &SeriesRequest| !is_fx(r)))
            .times(1)
            .returning(|_| {
                Ok(json!({
                    "Time Series (Digital Currency Intraday)": {
                        "2024-05-01 17:00:00": {
                            "1. open": "67000", "2. high": "67600", "3. low": "66900", "4. close": "67420.5"
                        }
                    }
                }))
            });

        let quote = cascade(mock).get_quote("BTCUSD").await;
        assert_eq!(quote.source, QuoteSource::AlphaVantageCrypto);
        assert_eq!(quote.price, 67420.5);
        assert_eq!(quote.timestamp, "2024-05-01 17:00:00");
    }

    #[tokio::test]
    async fn test_non_crypto_skips_crypto_tier() {
        let mut mock = MockQuoteTransport::new();
        mock.expect_fetch().times(1).returning(|_| rate_limited());

        let quote = cascade(mock).get_quote("XAUUSD").await;
        assert_eq!(quote.price, 2485.50);
        assert_eq!(quote.source, QuoteSource::MockData);
        assert_eq!(quote.note.as_deref(), Some(MOCK_NOTE));
    }

    #[tokio::test]
    async fn test_all_payload_failures_give_reference_price() {
        let mut mock = MockQuoteTransport::new();
        mock.expect_fetch().times(2).returning(|_| {
            Err(MarketError::AlphaVantageError("Invalid API call".to_string()))
        });

        let quote = cascade(mock).get_quote("ETHUSD").await;
        assert_eq!(quote.price, 3450.0);
        assert_eq!(quote.source, QuoteSource::MockData);
        assert!(quote.open.is_none());
    }

    #[tokio::test]
    async fn test_unknown_symbol_defaults_to_100() {
        let mut mock = MockQuoteTransport::new();
        mock.expect_fetch().returning(|_| rate_limited());

        let quote = cascade(mock).get_quote("NZDCAD").await;
        assert_eq!(quote.price, 100.0);
        assert_eq!(quote.source, QuoteSource::MockData);
    }

    #[tokio::test]
    async fn test_transport_failure_aborts_to_fallback() {
        let mut mock = MockQuoteTransport::new();
        // The crypto tier is never reached after a transport failure
        mock.expect_fetch().times(1).returning(|_| transport_failure());

        let quote = cascade(mock).get_quote("BTCUSD").await;
        assert_eq!(quote.source, QuoteSource::FallbackMock);
        assert_eq!(quote.price, 67500.0);
        assert_eq!(quote.note, None);
    }

    #[tokio::test]
    async fn test_fallback_uses_reduced_table() {
        let mut mock = MockQuoteTransport::new();
        mock.expect_fetch().returning(|_| transport_failure());

        let quote = cascade(mock).get_quote("XAGUSD").await;
        assert_eq!(quote.source, QuoteSource::FallbackMock);
        assert_eq!(quote.price, 100.0);
    }

    #[tokio::test]
    async fn test_non_numeric_close_is_no_data() {
        let mut mock = MockQuoteTransport::new();
        mock.expect_fetch().times(1).returning(|_| Ok(fx_payload("n/a")));

        let quote = cascade(mock).get_quote("EURUSD").await;
        assert_eq!(quote.source, QuoteSource::MockData);
        assert_eq!(quote.price, 1.0850);
    }

    #[tokio::test]
    async fn test_non_numeric_open_is_omitted() {
        let mut mock = MockQuoteTransport::new();
        mock.expect_fetch().returning(|_| {
            Ok(json!({
                "Time Series FX (5min)": {
                    "2024-05-01 16:55:00": { "1. open": "", "4. close": "1.2650" }
                }
            }))
        });

        let quote = cascade(mock).get_quote("GBPUSD").await;
        assert_eq!(quote.source, QuoteSource::AlphaVantageFx);
        assert_eq!(quote.open, None);
        assert_eq!(quote.high, None);
        assert_eq!(quote.price, 1.2650);
    }

    #[tokio::test]
    async fn test_every_failure_mode_yields_finite_price() {
        let failures: Vec<fn() -> Result<Value>> = vec![
            rate_limited,
            transport_failure,
            || Ok(json!({})),
            || Ok(json!({ "Time Series FX (5min)": {} })),
            || Ok(fx_payload("NaN")),
            || {
                Err(MarketError::HttpStatus {
                    provider: "Alpha Vantage".to_string(),
                    status: 503,
                })
            },
        ];

        for failure in failures {
            for symbol in ["XAUUSD", "BTCUSD", "X", ""] {
                let mut mock = MockQuoteTransport::new();
                mock.expect_fetch().returning(move |_| failure());

                let quote = cascade(mock).get_quote(symbol).await;
                assert!(quote.price.is_finite());
                assert!(matches!(
                    quote.source,
                    QuoteSource::MockData | QuoteSource::FallbackMock
                ));
            }
        }
    }

    #[tokio::test]
    async fn test_repeated_calls_agree_except_timestamp() {
        let mut mock = MockQuoteTransport::new();
        mock.expect_fetch().times(2).returning(|_| rate_limited());
        let cascade = cascade(mock);

        let first = cascade.get_quote("XAUUSD").await;
        let second = cascade.get_quote("XAUUSD").await;
        assert_eq!(first.price, second.price);
        assert_eq!(first.source, second.source);
        assert_eq!(first.note, second.note);
    }
}
