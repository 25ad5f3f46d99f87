//! Runtime configuration loaded from TOML.
//!
//! Every field is optional in the file; missing fields take their defaults.
//!
//! ```toml
//! system_name = "NextGenEHR"
//! default_patient_id = "P12345"
//! database_path = "/var/lib/ehr-assist/records.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::export::DEFAULT_SYSTEM_NAME;

pub const DEFAULT_PATIENT_ID: &str = "P12345";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Assistant configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Name printed in the structured-note footer
    pub system_name: String,
    /// Patient used when the caller gives none
    pub default_patient_id: String,
    /// SQLite file for saved records; in-memory when absent
    pub database_path: Option<PathBuf>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            system_name: DEFAULT_SYSTEM_NAME.to_string(),
            default_patient_id: DEFAULT_PATIENT_ID.to_string(),
            database_path: None,
        }
    }
}

impl AssistConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Patient id to use, falling back to the configured default.
    pub fn patient_id_or_default<'a>(&'a self, patient_id: Option<&'a str>) -> &'a str {
        patient_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.default_patient_id)
    }
}
