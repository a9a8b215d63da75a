//! Configuration management utilities

use crate::LogFormat;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_HISTORY_FILE: &str = "infinity-history.json";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value could not be parsed
    #[error("Invalid value for {key}: {detail}")]
    InvalidValue { key: String, detail: String },
}

/// Read an environment variable, treating blank values as unset
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read an environment variable or fall back to a default
pub fn env_or(key: &str, default: &str) -> String {
    env_var(key).unwrap_or_else(|| default.to_string())
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,
    /// File backing the local history store
    pub history_path: PathBuf,
    /// Log output format
    #[serde(skip)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "infinity-gateway".to_string(),
            environment: "development".to_string(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from `INFINITY_*` environment variables
    ///
    /// - `INFINITY_ENV` (default `development`)
    /// - `INFINITY_LISTEN_ADDR` (default `0.0.0.0:3000`)
    /// - `INFINITY_HISTORY_PATH` (default `infinity-history.json`)
    /// - `INFINITY_LOG_FORMAT` (`pretty` or `json`; production defaults to `json`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self {
            environment: env_or("INFINITY_ENV", "development"),
            ..Self::default()
        };
        let default_format = if defaults.is_production() {
            LogFormat::Json
        } else {
            defaults.log_format
        };

        let listen_addr = env_or("INFINITY_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                key: "INFINITY_LISTEN_ADDR".to_string(),
                detail: e.to_string(),
            })?;

        let log_format = match env_var("INFINITY_LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(|detail| ConfigError::InvalidValue {
                key: "INFINITY_LOG_FORMAT".to_string(),
                detail,
            })?,
            None => default_format,
        };

        Ok(Self {
            app_name: defaults.app_name,
            environment: defaults.environment,
            listen_addr,
            history_path: env_var("INFINITY_HISTORY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_path),
            log_format,
        })
    }

    /// Whether the process runs in a production environment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
