//! Shared utilities for the Infinity gateway
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup, configuration management, and environment helpers.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, env_or, env_var};
pub use logging::{LogFormat, init_tracing_with};
