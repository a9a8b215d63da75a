//! Error types for analysis operations

use infinity_llm::LLMError;
use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Reasons a live analysis could not be produced
///
/// None of these reach callers of [`crate::AnalysisClient::analyze`]; they
/// select the fallback result and are logged.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No generative provider is configured
    #[error("No generative provider configured")]
    NotConfigured,

    /// The provider call failed
    #[error("Provider error: {0}")]
    Provider(#[from] LLMError),

    /// The provider answered with no content
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// The reply is not valid JSON of the expected shape
    #[error("Malformed analysis output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    /// The reply parsed but violates the result schema
    #[error("Analysis output violates schema: {0}")]
    SchemaViolation(String),

    /// A prompt template failed to render
    #[error("Prompt template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
