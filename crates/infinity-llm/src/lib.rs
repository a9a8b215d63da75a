//! Generative-language provider abstraction for the Infinity gateway
//!
//! This crate provides provider-agnostic abstractions for requesting
//! completions from a Large Language Model. It includes:
//!
//! - Message types for LLM communication
//! - Completion request/response types, including JSON response formats
//! - Provider trait for LLM implementations, with a reachability probe
//! - The OpenAI chat-completions provider

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{
    CompletionRequest, CompletionResponse, ResponseFormat, StopReason, TokenUsage,
};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
