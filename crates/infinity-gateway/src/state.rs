//! Shared application state

use anyhow::Result;
use infinity_analysis::{AnalysisClient, AnalysisConfig};
use infinity_llm::providers::{OpenAIConfig, OpenAIProvider};
use infinity_market::{MarketConfig, QuoteCascade};
use std::sync::Arc;
use tracing::{info, warn};

/// Services behind the HTTP routes and CLI commands
#[derive(Clone)]
pub struct AppState {
    pub quotes: QuoteCascade,
    pub analysis: AnalysisClient,
}

impl AppState {
    pub fn new(quotes: QuoteCascade, analysis: AnalysisClient) -> Self {
        Self { quotes, analysis }
    }

    /// Wire the real providers from configuration
    ///
    /// A missing `OPENAI_API_KEY` is not an error: analyses then always use
    /// the fallback result and the status endpoint reports `unconfigured`.
    pub fn from_config(market: &MarketConfig, analysis: AnalysisConfig) -> Result<Self> {
        analysis.validate()?;

        if market.uses_demo_key() {
            warn!("ALPHA_VANTAGE_KEY not set, using the demo key");
        }
        let quotes = QuoteCascade::from_config(market)?;

        let analysis = match OpenAIConfig::from_env() {
            Ok(config) => {
                info!(model = %analysis.model, api_base = %config.api_base, "OpenAI provider configured");
                AnalysisClient::new(Arc::new(OpenAIProvider::with_config(config)?), analysis)
            }
            Err(e) => {
                warn!(reason = %e, "No OpenAI provider, analyses will use the fallback");
                AnalysisClient::unconfigured(analysis)
            }
        };

        Ok(Self::new(quotes, analysis))
    }
}
