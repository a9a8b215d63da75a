//! Error types for the history store

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HistoryError>;

#[derive(Error, Debug)]
pub enum HistoryError {
    /// Reading or writing the backing file failed
    #[error("History file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a valid history snapshot
    #[error("History file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A preference value was rejected
    #[error("Invalid preference {name}: {detail}")]
    InvalidPreference { name: &'static str, detail: String },
}
