//! Checklist store configuration.
//!
//! # Invariants
//! - All configured names are non-blank after trimming.
//! - Defaults keep compatibility with previously exported files and stored
//!   snapshots.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default snapshot key in the key-value store.
pub const DEFAULT_STORAGE_KEY: &str = "travel-checklist-items";
/// Default SQLite file name for hosts that persist to disk.
pub const DEFAULT_DB_FILE_NAME: &str = "checklist.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    BlankField(&'static str),
    Parse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "config field `{field}` cannot be blank"),
            Self::Parse(message) => write!(f, "invalid checklist config: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Names used by the checklist service and its hosts.
///
/// Missing fields fall back to defaults when parsed from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChecklistConfig {
    /// Key under which the committed list snapshot is stored.
    pub storage_key: String,
    /// Suggested download name for exports.
    pub export_file_name: String,
    /// SQLite file name, relative to the host data directory.
    pub db_file_name: String,
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export_file_name: crate::transfer::EXPORT_FILE_NAME.to_string(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
        }
    }
}

impl ChecklistConfig {
    /// Parses a JSON config object and validates it.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("storage_key", &self.storage_key),
            ("export_file_name", &self.export_file_name),
            ("db_file_name", &self.db_file_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::BlankField(field));
            }
        }
        Ok(())
    }
}
