/// Application configuration management
/// Stores user preferences in ~/.config/docktui/config.json

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::docker::TailSpec;
use crate::utils::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ACCENT_COLOR, DEFAULT_FOOTER_COLOR,
    DEFAULT_LOG_TAIL, DEFAULT_STATUS_COLOR,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub list: ListConfig,
    pub ui: UiConfig,
}

/// Defaults for the `list` and `logs` commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListConfig {
    pub running: bool,
    pub name: String,
    pub json: bool,
    pub logs_tail: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            running: false,
            name: String::new(),
            json: false,
            logs_tail: DEFAULT_LOG_TAIL.to_string(),
        }
    }
}

/// Color names used by the dashboard and colored CLI output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiConfig {
    pub footer_color: String,
    pub status_color: String,
    pub accent_color: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            footer_color: DEFAULT_FOOTER_COLOR.to_string(),
            status_color: DEFAULT_STATUS_COLOR.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
        }
    }
}

impl AppConfig {
    /// Default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine the user config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location or an explicit path.
    ///
    /// A missing, unreadable or malformed file yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Ok(p) => p,
                Err(e) => {
                    warn!(error = %e, "using default configuration");
                    return Self::default();
                }
            },
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::read(&path) {
            Ok(config) => config.with_fallbacks(),
            Err(e) => {
                warn!(path = %path.display(), error = ?e, "ignoring config file");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Self = serde_json::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Blank strings fall back to their defaults
    fn with_fallbacks(mut self) -> Self {
        let defaults = Self::default();

        if self.list.logs_tail.trim().is_empty() {
            self.list.logs_tail = defaults.list.logs_tail;
        }
        if self.ui.footer_color.trim().is_empty() {
            self.ui.footer_color = defaults.ui.footer_color;
        }
        if self.ui.status_color.trim().is_empty() {
            self.ui.status_color = defaults.ui.status_color;
        }
        if self.ui.accent_color.trim().is_empty() {
            self.ui.accent_color = defaults.ui.accent_color;
        }

        self
    }

    /// Default tail for `logs`; an unparseable value falls back to 100 lines
    pub fn logs_tail(&self) -> TailSpec {
        self.list.logs_tail.parse().unwrap_or_else(|e: String| {
            warn!(error = %e, "invalid logsTail in config");
            TailSpec::default()
        })
    }
}
