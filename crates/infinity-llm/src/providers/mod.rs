//! Concrete LLM provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! the generative services the gateway talks to.

pub mod openai;

pub use openai::{OpenAIConfig, OpenAIProvider};
