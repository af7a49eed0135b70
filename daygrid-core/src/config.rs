//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/daygrid/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/daygrid/` (~/.config/daygrid/)
//! - State/Logs: `$XDG_STATE_HOME/daygrid/` (~/.local/state/daygrid/)

use crate::error::{Error, Result};
use crate::layout::ProjectionConfig;
use crate::time::to_minutes;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Grid geometry
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Tap-to-expand behavior
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Day grid geometry
#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    /// First wall-clock time drawn at the top of the grid (`HH:MM`)
    #[serde(default = "default_day_start")]
    pub day_start: String,

    /// Last wall-clock time the grid extends to (`HH:MM`)
    #[serde(default = "default_day_end")]
    pub day_end: String,

    /// Vertical pixels per minute
    #[serde(default = "default_pixels_per_minute")]
    pub pixels_per_minute: f64,

    /// Spacing of the time labels in the gutter
    #[serde(default = "default_row_interval_minutes")]
    pub row_interval_minutes: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            day_start: default_day_start(),
            day_end: default_day_end(),
            pixels_per_minute: default_pixels_per_minute(),
            row_interval_minutes: default_row_interval_minutes(),
        }
    }
}

fn default_day_start() -> String {
    "05:30".to_string()
}

fn default_day_end() -> String {
    "22:00".to_string()
}

fn default_pixels_per_minute() -> f64 {
    1.6
}

fn default_row_interval_minutes() -> u32 {
    50
}

impl LayoutConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        let start = self.day_start_minutes()?;
        let end = self.day_end_minutes()?;

        if end <= start {
            return Err(Error::Config(format!(
                "layout.day_end ({}) must be after layout.day_start ({})",
                self.day_end, self.day_start
            )));
        }
        if !self.pixels_per_minute.is_finite() || self.pixels_per_minute <= 0.0 {
            return Err(Error::Config(
                "layout.pixels_per_minute must be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn day_start_minutes(&self) -> Result<u32> {
        to_minutes(&self.day_start)
            .map_err(|e| Error::Config(format!("layout.day_start: {}", e)))
    }

    pub fn day_end_minutes(&self) -> Result<u32> {
        to_minutes(&self.day_end).map_err(|e| Error::Config(format!("layout.day_end: {}", e)))
    }

    /// The projection parameters for the render model.
    pub fn projection(&self) -> Result<ProjectionConfig> {
        self.validate()?;
        Ok(ProjectionConfig {
            day_start_minutes: self.day_start_minutes()?,
            pixels_per_minute: self.pixels_per_minute,
        })
    }
}

/// Selection configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SelectionConfig {
    /// Pause between closing a group picker and opening the chosen detail.
    /// Zero switches directly.
    #[serde(default = "default_detail_delay_ms")]
    pub detail_delay_ms: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            detail_delay_ms: default_detail_delay_ms(),
        }
    }
}

fn default_detail_delay_ms() -> u64 {
    250
}

impl SelectionConfig {
    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.layout.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/daygrid/config.toml` (~/.config/daygrid/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("daygrid").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/daygrid/` (~/.local/state/daygrid/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("daygrid")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/daygrid/daygrid.log` (~/.local/state/daygrid/daygrid.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("daygrid.log")
    }
}
