//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations of this trait provide access to a generative service
/// (e.g., OpenAI or an OpenAI-compatible endpoint).
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    ///
    /// # Arguments
    ///
    /// * `request` - The completion request with messages and parameters
    ///
    /// # Returns
    ///
    /// The completion response with the assistant's message and metadata
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Check that the service is reachable and accepts our credentials
    async fn health_check(&self) -> Result<()>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;
}
