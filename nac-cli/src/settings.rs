//! Application settings

use std::path::{Path, PathBuf};

use nac_receiver::RawSetupInput;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from persisting settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine settings path")]
    NoPath,

    #[error("failed to create settings directory: {0}")]
    CreateDir(#[source] std::io::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write settings: {0}")]
    Write(#[source] std::io::Error),
}

/// Where service calls go when no command-line override is given
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSettings {
    /// Connection type: "stdout", "tcp" or "sim"
    pub connection_type: String,
    /// Host and port (if connection_type is "tcp")
    #[serde(default)]
    pub address: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            connection_type: "stdout".to_string(),
            address: String::new(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Setup form as last saved; validated again on every load
    #[serde(default)]
    pub device: Option<RawSetupInput>,
    /// Service call output
    #[serde(default)]
    pub output: OutputSettings,
}

impl Settings {
    /// Get the XDG config directory for nacremote
    /// Uses $XDG_CONFIG_HOME/nacremote, falls back to ~/.config/nacremote
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("nacremote"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("nacremote"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from a specific file; missing or unreadable files give defaults
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoPath)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SettingsError::CreateDir)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(SettingsError::Write)?;

        Ok(())
    }
}
