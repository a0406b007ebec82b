use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use curricula_engine::CreditThresholds;
use curricula_source::RangeNames;

use super::{WorkspaceError, WorkspaceResult};

/// File read when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "curricula.toml";

/// Settings read from `curricula.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one CSV file per reference range.
    pub data_dir: PathBuf,
    /// Root of the saved-plan store.
    pub store_dir: PathBuf,
    pub ranges: RangeNames,
    pub thresholds: CreditThresholds,
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            store_dir: PathBuf::from("plans"),
            ranges: RangeNames::default(),
            thresholds: CreditThresholds::default(),
            log_json: false,
        }
    }
}

/// Load settings from `explicit`, or from [`DEFAULT_SETTINGS_FILE`] when it
/// exists. An explicitly named file must exist; a missing default file
/// yields defaults.
pub fn load_settings(explicit: Option<&Path>) -> WorkspaceResult<Settings> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(WorkspaceError::Invalid(format!(
                "settings file {} not found",
                path.display()
            )));
        }
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if !path.exists() {
                return Ok(Settings::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)?;
    parse_settings(&content)
}

pub fn parse_settings(content: &str) -> WorkspaceResult<Settings> {
    Ok(toml::from_str(content)?)
}
