//! Market data for the Infinity gateway
//!
//! Resolves user-facing symbols (`XAUUSD`, `BTCUSD`, ...) into provider
//! currency pairs and produces a price for any symbol through a tiered
//! cascade:
//!
//! - Alpha Vantage FX intraday series
//! - Alpha Vantage digital-currency series (crypto symbols only)
//! - Static reference prices when the provider is rate limited
//! - A last-resort fallback price when the provider is unreachable
//!
//! Every quote carries the label of the tier that produced it.
//!
//! # Example
//!
//! ```rust,ignore
//! use infinity_market::{MarketConfig, QuoteCascade};
//!
//! let cascade = QuoteCascade::from_config(&MarketConfig::from_env()?)?;
//! let quote = cascade.get_quote("XAUUSD").await;
//! println!("{} {} ({})", quote.symbol, quote.price, quote.source);
//! ```

pub mod api;
pub mod cascade;
pub mod config;
pub mod error;
pub mod quote;
pub mod reference;
pub mod symbol;

pub use api::{AlphaVantageClient, Bar, QuoteTransport, SeriesRequest};
pub use cascade::QuoteCascade;
pub use config::{MarketConfig, MarketConfigBuilder};
pub use error::{MarketError, Result};
pub use quote::{Quote, QuoteSource};
pub use symbol::{CurrencyPair, DEFAULT_SYMBOL, is_crypto, normalize, resolve};
