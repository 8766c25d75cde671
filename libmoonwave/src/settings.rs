//! Settings management for Moonwave applications
//!
//! Settings live in a TOML file. Every section is optional; missing values
//! fall back to the same defaults the builder uses.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingsError};
use crate::logging::LogFormat;
use crate::router::RouteDef;
use crate::schedule::FRAME_INTERVAL;
use crate::state::State;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: AppSettings,
    pub logging: LoggingSettings,

    /// Initial state table
    pub state: State,

    pub routes: Vec<RouteDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub initial_path: Option<String>,

    /// Render debounce window, e.g. "17ms"
    pub frame_interval: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub format: String,
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default location
    ///
    /// A missing file is not an error: defaults are returned instead.
    pub fn load() -> Result<Self> {
        let path = resolve_settings_path()?;
        if !path.exists() {
            return Ok(Self::default_settings());
        }
        Self::load_from_path(&path)
    }

    /// Load settings from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(SettingsError::ReadError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).map_err(SettingsError::ParseError)?;
        Ok(settings)
    }

    pub fn default_settings() -> Self {
        Self {
            app: AppSettings {
                initial_path: Some("/".to_string()),
                frame_interval: Some(humantime::format_duration(FRAME_INTERVAL).to_string()),
            },
            ..Default::default()
        }
    }

    /// Parsed render debounce window
    pub fn frame_interval(&self) -> Result<Duration> {
        match &self.app.frame_interval {
            None => Ok(FRAME_INTERVAL),
            Some(raw) => humantime::parse_duration(raw).map_err(|e| {
                SettingsError::InvalidValue {
                    field: "app.frame_interval".to_string(),
                    reason: e.to_string(),
                }
                .into()
            }),
        }
    }

    pub fn log_format(&self) -> Result<LogFormat> {
        self.logging.format.parse().map_err(|reason| {
            SettingsError::InvalidValue {
                field: "logging.format".to_string(),
                reason,
            }
            .into()
        })
    }
}

/// Resolve the settings file path: `MOONWAVE_CONFIG`, else the XDG config directory
pub fn resolve_settings_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("MOONWAVE_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| SettingsError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("moonwave").join("config.toml"))
}
