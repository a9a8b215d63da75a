//! Test doubles shared by the gateway's unit tests

use crate::state::AppState;
use async_trait::async_trait;
use infinity_analysis::{AnalysisClient, AnalysisConfig};
use infinity_market::{MarketConfig, MarketError, QuoteCascade, QuoteTransport, SeriesRequest};
use serde_json::Value;
use std::sync::Arc;

/// Upstream that always answers with a throttling notice
pub struct RateLimited;

#[async_trait]
impl QuoteTransport for RateLimited {
    async fn fetch(&self, _request: &SeriesRequest) -> infinity_market::Result<Value> {
        Err(MarketError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        })
    }
}

pub fn offline_quotes() -> QuoteCascade {
    QuoteCascade::new(Arc::new(RateLimited), &MarketConfig::default())
}

/// State with no reachable upstreams: reference prices and fallback analyses
pub fn offline_state() -> AppState {
    AppState::new(
        offline_quotes(),
        AnalysisClient::unconfigured(AnalysisConfig::default()),
    )
}
