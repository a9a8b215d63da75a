//! AI trading analysis for the Infinity gateway
//!
//! - [`build_request`] turns raw user input (symbol, timeframe, swing high and
//!   low, free-text prompt) into an [`AnalysisRequest`] with Fibonacci
//!   retracement levels.
//! - [`AnalysisClient`] sends the request to a generative provider, validates
//!   the JSON reply against the [`AnalysisResult`] schema and substitutes a
//!   deterministic fallback when anything goes wrong.

pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod fibonacci;
pub mod prompts;
pub mod request;
pub mod result;

pub use client::{AnalysisClient, ProviderState, ServiceStatus};
pub use config::{AnalysisConfig, DEFAULT_MODEL};
pub use error::{AnalysisError, Result};
pub use fallback::fallback_analysis;
pub use fibonacci::{FibonacciLevels, RETRACEMENT_RATIOS, parse_swing, retracement_levels};
pub use request::{AnalysisRequest, build_request, default_prompt};
pub use result::{AnalysisResult, Bias, KeyLevel, LevelType, parse_analysis};
