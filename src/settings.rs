//! User settings persistence.
//!
//! This module handles loading and saving analysis preferences across runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::report::ReportFormat;
use crate::state::DOWNTIME_THRESHOLD_SECS;

/// User settings that persist across runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Board gap (seconds) above which the line counts as down
    #[serde(default = "default_threshold")]
    pub downtime_threshold_secs: i64,
    /// Root folder reports are written under
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    /// Format used when saving new reports
    #[serde(default)]
    pub report_format: ReportFormat,
}

fn default_version() -> u32 {
    1
}

fn default_threshold() -> i64 {
    DOWNTIME_THRESHOLD_SECS
}

fn default_report_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("CycleReports")
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            version: 1,
            downtime_threshold_secs: default_threshold(),
            report_dir: default_report_dir(),
            report_format: ReportFormat::default(),
        }
    }
}

impl UserSettings {
    /// Get the config directory path for cyclelog
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("CycleLog"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("CycleLog"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs::config_dir().map(|p| p.join("cyclelog"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        match Self::get_settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a specific file, falling back to defaults if it is
    /// missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid settings file {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = Self::get_settings_path()
            .ok_or_else(|| "Could not determine config directory".to_string())?;
        self.save_to(&path)
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }
}
