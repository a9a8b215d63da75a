//! Generative analysis client

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::fallback::fallback_analysis;
use crate::prompts::{SYSTEM_PROMPT, user_prompt};
use crate::request::AnalysisRequest;
use crate::result::{AnalysisResult, parse_analysis};
use infinity_llm::{CompletionRequest, LLMProvider, Message};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Reachability of the generative service as seen by the status probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderState {
    Connected,
    Unreachable,
    Unconfigured,
}

/// Body of the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Always `"live"`: the gateway itself is up
    pub status: String,
    pub openai: ProviderState,
    pub model: String,
}

/// Produces trading analyses, falling back to a fixed result on any failure
#[derive(Clone)]
pub struct AnalysisClient {
    provider: Option<Arc<dyn LLMProvider>>,
    config: AnalysisConfig,
}

impl AnalysisClient {
    /// Create a client over a configured provider
    pub fn new(provider: Arc<dyn LLMProvider>, config: AnalysisConfig) -> Self {
        Self {
            provider: Some(provider),
            config,
        }
    }

    /// Client without a provider; every analysis is the fallback
    pub fn unconfigured(config: AnalysisConfig) -> Self {
        Self {
            provider: None,
            config,
        }
    }

    /// Analyze a request
    ///
    /// Never fails: provider errors, malformed output and schema violations
    /// all yield [`fallback_analysis`] for the request's symbol.
    #[instrument(skip(self, request), fields(symbol = %request.symbol, timeframe = %request.timeframe))]
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        match self.try_analyze(request).await {
            Ok(result) => {
                info!(bias = ?result.bias, confidence = result.confidence, "Live analysis");
                result
            }
            Err(e) => {
                warn!(error = %e, "Analysis failed, using fallback");
                fallback_analysis(&request.symbol)
            }
        }
    }

    /// The live path, with its failure reason
    pub async fn try_analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let provider = self.provider.as_ref().ok_or(AnalysisError::NotConfigured)?;

        let mut builder = CompletionRequest::builder(&self.config.model)
            .system(SYSTEM_PROMPT)
            .add_message(Message::user(user_prompt(request)?))
            .max_tokens(self.config.max_tokens)
            .json_output();
        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }

        let response = provider.complete(builder.build()).await?;
        debug!(
            stop_reason = ?response.stop_reason,
            tokens = response.usage.total(),
            "Completion received"
        );

        let content = response.message.text().ok_or(AnalysisError::EmptyResponse)?;
        parse_analysis(content)
    }

    /// Probe the provider without affecting [`Self::analyze`]
    pub async fn status(&self) -> ServiceStatus {
        let openai = match &self.provider {
            None => ProviderState::Unconfigured,
            Some(provider) => match provider.health_check().await {
                Ok(()) => ProviderState::Connected,
                Err(e) => {
                    debug!(error = %e, "Provider health check failed");
                    ProviderState::Unreachable
                }
            },
        };

        ServiceStatus {
            status: "live".to_string(),
            openai,
            model: self.config.model.clone(),
        }
    }
}
