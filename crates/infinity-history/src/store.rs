//! File-backed history store

use crate::bounded::BoundedHistory;
use crate::entry::{HistoryEntry, Preferences};
use crate::error::{HistoryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CALCULATION_CAPACITY: usize = 50;
pub const ANALYSIS_CAPACITY: usize = 20;

/// On-disk layout
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snapshot {
    preferences: Preferences,
    recent_calculations: Vec<HistoryEntry>,
    ai_analysis_history: Vec<HistoryEntry>,
}

/// Recent calculations and analyses, most recent first
///
/// Every mutation is written through to the backing file (if any), so the
/// contents survive restarts. Entries are only removed by eviction or an
/// explicit clear.
#[derive(Debug)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    calculations: BoundedHistory<HistoryEntry>,
    analyses: BoundedHistory<HistoryEntry>,
    preferences: Preferences,
}

impl HistoryStore {
    /// Store that is never persisted
    pub fn in_memory() -> Self {
        Self {
            path: None,
            calculations: BoundedHistory::new(CALCULATION_CAPACITY),
            analyses: BoundedHistory::new(ANALYSIS_CAPACITY),
            preferences: Preferences::default(),
        }
    }

    /// Open the store backed by `path`, starting empty if the file is absent
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let snapshot = match fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| HistoryError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No history file yet");
                Snapshot::default()
            }
            Err(source) => return Err(HistoryError::Io { path, source }),
        };

        let store = Self {
            calculations: BoundedHistory::from_newest_first(
                CALCULATION_CAPACITY,
                snapshot.recent_calculations,
            ),
            analyses: BoundedHistory::from_newest_first(
                ANALYSIS_CAPACITY,
                snapshot.ai_analysis_history,
            ),
            preferences: snapshot.preferences,
            path: Some(path),
        };

        info!(
            calculations = store.calculations.len(),
            analyses = store.analyses.len(),
            "History loaded"
        );
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn append_calculation(&mut self, entry: HistoryEntry) -> Result<()> {
        let mut calculations = self.calculations.clone();
        calculations.push(entry);
        self.write(&calculations, &self.analyses, &self.preferences)?;
        self.calculations = calculations;
        Ok(())
    }

    pub fn append_analysis(&mut self, entry: HistoryEntry) -> Result<()> {
        let mut analyses = self.analyses.clone();
        analyses.push(entry);
        self.write(&self.calculations, &analyses, &self.preferences)?;
        self.analyses = analyses;
        Ok(())
    }

    pub fn clear_calculations(&mut self) -> Result<()> {
        let calculations = BoundedHistory::new(CALCULATION_CAPACITY);
        self.write(&calculations, &self.analyses, &self.preferences)?;
        self.calculations = calculations;
        Ok(())
    }

    pub fn clear_analyses(&mut self) -> Result<()> {
        let analyses = BoundedHistory::new(ANALYSIS_CAPACITY);
        self.write(&self.calculations, &analyses, &self.preferences)?;
        self.analyses = analyses;
        Ok(())
    }

    /// Calculations, most recent first
    pub fn calculations(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.calculations.iter()
    }

    /// Analyses, most recent first
    pub fn analyses(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.analyses.iter()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Set the default account size; must be positive
    pub fn set_default_account_size(&mut self, size: f64) -> Result<()> {
        if !size.is_finite() || size <= 0.0 {
            return Err(HistoryError::InvalidPreference {
                name: "defaultAccountSize",
                detail: format!("{size} is not a positive amount"),
            });
        }
        self.update_preferences(|prefs| prefs.default_account_size = size)
    }

    /// Set the default risk; must lie in (0, 100]
    pub fn set_default_risk_percent(&mut self, percent: f64) -> Result<()> {
        if !percent.is_finite() || percent <= 0.0 || percent > 100.0 {
            return Err(HistoryError::InvalidPreference {
                name: "defaultRiskPercent",
                detail: format!("{percent} outside (0, 100]"),
            });
        }
        self.update_preferences(|prefs| prefs.default_risk_percent = percent)
    }

    /// Remember the calculator shown first; must not be blank
    pub fn set_selected_calculator(&mut self, id: &str) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(HistoryError::InvalidPreference {
                name: "selectedCalculator",
                detail: "calculator id is blank".to_string(),
            });
        }
        self.update_preferences(|prefs| prefs.selected_calculator = id.to_string())
    }

    fn update_preferences(&mut self, change: impl FnOnce(&mut Preferences)) -> Result<()> {
        let mut preferences = self.preferences.clone();
        change(&mut preferences);
        self.write(&self.calculations, &self.analyses, &preferences)?;
        self.preferences = preferences;
        Ok(())
    }

    /// Write a snapshot atomically (temp file, then rename)
    ///
    /// Callers stage their change on copies and only install it once this
    /// returns `Ok`, so a failed write leaves memory matching the disk.
    fn write(
        &self,
        calculations: &BoundedHistory<HistoryEntry>,
        analyses: &BoundedHistory<HistoryEntry>,
        preferences: &Preferences,
    ) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let snapshot = Snapshot {
            preferences: preferences.clone(),
            recent_calculations: calculations.iter().cloned().collect(),
            ai_analysis_history: analyses.iter().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        let io_err = |source| HistoryError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;

        debug!(path = %path.display(), "History saved");
        Ok(())
    }
}
