//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Storage key for saved form values
    pub storage_key: Option<String>,
    /// Round the prefilled consultation time to ten minutes
    pub round_time: Option<bool>,
    /// Root container kind: "form", "div", "section" or "article"
    pub container_kind: Option<String>,
}

impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "consult", "consult-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Effective storage key
    pub fn storage_key(&self) -> &str {
        self.storage_key
            .as_deref()
            .unwrap_or(crate::form::STORAGE_KEY)
    }

    /// Effective time-rounding flag (on by default)
    pub fn round_time(&self) -> bool {
        self.round_time.unwrap_or(true)
    }
}
