//! Configuration for the analysis client

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Model used when `OPENAI_MODEL` is not set
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Parameters of the completion request sent for each analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Model identifier
    pub model: String,

    /// Upper bound on generated tokens
    pub max_tokens: usize,

    /// Sampling temperature, provider default when unset
    pub temperature: Option<f32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: None,
        }
    }
}

impl AnalysisConfig {
    /// Load from the environment (`OPENAI_MODEL`)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(model) = std::env::var("OPENAI_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
        {
            config.model = model;
        }
        config
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AnalysisError::Config("model must not be blank".to_string()));
        }

        if self.max_tokens == 0 {
            return Err(AnalysisError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if let Some(t) = self.temperature.filter(|t| !(0.0..=2.0).contains(t)) {
            return Err(AnalysisError::Config(format!(
                "temperature {t} outside 0.0-2.0"
            )));
        }

        Ok(())
    }
}
