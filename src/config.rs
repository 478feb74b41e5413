//! Analysis settings, loadable from a JSON file.
//!
//! ```json
//! {
//!   "sort_key": "created_at",
//!   "policy": "per_event",
//!   "windows_days": [91, 30],
//!   "ambiguous": "drop"
//! }
//! ```
//!
//! Missing fields fall back to [`AnalysisConfig::default`].

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzers::rolling::WindowPolicy;
use crate::error::ConfigError;
use crate::loader::{AmbiguousPolicy, LoadOptions};
use crate::series::SortKey;

/// Longest rolling window accepted, in days.
pub const MAX_WINDOW_DAYS: u32 = 3650;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Timestamp that orders the averaged series.
    pub sort_key: SortKey,
    pub policy: WindowPolicy,
    /// Rolling window lengths, one series each.
    pub windows_days: Vec<u32>,
    pub ambiguous: AmbiguousPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sort_key: SortKey::CreatedAt,
            policy: WindowPolicy::PerEvent,
            windows_days: vec![91, 30],
            ambiguous: AmbiguousPolicy::Drop,
        }
    }
}

impl AnalysisConfig {
    /// Loads and validates the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.windows_days.is_empty() {
            return Err(ConfigError::NoWindows);
        }

        let mut seen = HashSet::new();
        for &days in &self.windows_days {
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(ConfigError::WindowOutOfRange {
                    days,
                    max: MAX_WINDOW_DAYS,
                });
            }
            if !seen.insert(days) {
                return Err(ConfigError::DuplicateWindow(days));
            }
        }

        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            ambiguous: self.ambiguous,
        }
    }
}
