use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::api::types::{DEFAULT_HISTORY_DAYS, DEFAULT_PAGE_SIZE, MAX_HISTORY_DAYS, MAX_PAGE_SIZE};
use crate::api::DEFAULT_BASE_URL;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "WONGPRIME_API_URL";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unable to determine config directory")]
    NoConfigDir,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level dashboard configuration, stored as TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub dashboard: DisplayConfig,
    /// Theme name: "dark", "light" or "high-contrast"
    pub theme: String,
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Page behaviour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Products requested per listing
    pub page_size: u32,
    /// Days of history shown in the product detail
    pub history_days: u32,
    /// Lifetime of toast notifications
    pub toast_seconds: u64,
    /// UI redraw interval
    pub tick_rate_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            dashboard: DisplayConfig::default(),
            theme: "dark".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            history_days: DEFAULT_HISTORY_DAYS,
            toast_seconds: 5,
            tick_rate_ms: 100,
        }
    }
}

impl DashboardConfig {
    /// Default location: `<config_dir>/wongprime/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("wongprime").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from an explicit path, or the default path when none is given.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: DashboardConfig = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides: explicit CLI value first, then the environment
    pub fn with_overrides(mut self, api_url: Option<&str>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        } else if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs must be positive".into()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.dashboard.page_size) {
            return Err(ConfigError::Invalid(format!(
                "dashboard.page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if !(1..=MAX_HISTORY_DAYS).contains(&self.dashboard.history_days) {
            return Err(ConfigError::Invalid(format!(
                "dashboard.history_days must be between 1 and {MAX_HISTORY_DAYS}"
            )));
        }
        Ok(())
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.dashboard.toast_seconds.max(1))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.dashboard.tick_rate_ms.max(10))
    }
}
