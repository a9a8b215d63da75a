//! History entries and user preferences

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One recorded calculation or analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    /// Calculator id for calculations, analysis id for analyses
    pub source_id: String,
    pub inputs: Map<String, Value>,
    pub result: Value,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// New entry with a fresh id, stamped now
    pub fn new(source_id: impl Into<String>, inputs: Map<String, Value>, result: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source_id: source_id.into(),
            inputs,
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Persisted user defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub default_account_size: f64,
    pub default_risk_percent: f64,
    pub selected_calculator: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_account_size: 10_000.0,
            default_risk_percent: 2.0,
            selected_calculator: "fibonacci".to_string(),
        }
    }
}
