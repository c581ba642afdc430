//! Patch settings.
//!
//! Loaded once from `settings.json` at startup. A missing or malformed file
//! yields the defaults, which leave every optional behavior switched off.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_RETREAT_ZONE_STATE_KEY, SETTINGS_FILE_NAME, SETTINGS_PATH_ENV};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Zone state key for scenarios absent from `retreat_zone_state_keys`.
    pub default_retreat_zone_state_key: String,
    /// Scenario key -> zone state key.
    pub retreat_zone_state_keys: HashMap<String, String>,
    /// Attach the zone validators to the eject and retreat definitions.
    pub use_patch: bool,
    /// Swap a queued eject/retreat for its legal counterpart.
    pub use_action_swap: bool,
    /// Accept console commands.
    pub register_commands: bool,
    /// Emit decision traces.
    pub log_diagnostics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_retreat_zone_state_key: DEFAULT_RETREAT_ZONE_STATE_KEY.to_string(),
            retreat_zone_state_keys: HashMap::new(),
            use_patch: false,
            use_action_swap: false,
            register_commands: false,
            log_diagnostics: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Load from `path`, falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        let settings = match Self::from_file(path) {
            Ok(settings) => {
                tracing::info!(
                    target: "retreat_guard::settings",
                    path = %path.display(),
                    "settings.loaded=file"
                );
                settings
            }
            Err(err) => {
                tracing::warn!(
                    target: "retreat_guard::settings",
                    path = %path.display(),
                    error = %err,
                    "settings.loaded=defaults"
                );
                Self::default()
            }
        };
        settings.log_summary(path);
        settings
    }

    /// `$RETREAT_GUARD_SETTINGS` if set, else `settings.json` in `dir`.
    pub fn resolve_path(dir: &Path) -> PathBuf {
        match env::var(SETTINGS_PATH_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => dir.join(SETTINGS_FILE_NAME),
        }
    }

    /// Zone state key for a scenario: the mapped key, or the default.
    pub fn retreat_zone_state_key(&self, scenario_key: &str) -> &str {
        self.retreat_zone_state_keys
            .get(scenario_key)
            .map(String::as_str)
            .unwrap_or(&self.default_retreat_zone_state_key)
    }

    fn log_summary(&self, path: &Path) {
        let mut state_keys: Vec<_> = self
            .retreat_zone_state_keys
            .iter()
            .map(|(scenario, key)| format!("{scenario}={key}"))
            .collect();
        state_keys.sort();
        tracing::info!(
            target: "retreat_guard::settings",
            path = %path.display(),
            default_state_key = %self.default_retreat_zone_state_key,
            state_key_map = %state_keys.join(", "),
            use_patch = self.use_patch,
            use_action_swap = self.use_action_swap,
            console_commands = if self.register_commands { "register" } else { "-" },
            diagnostics = if self.log_diagnostics { "on" } else { "off" },
            "settings"
        );
    }
}
