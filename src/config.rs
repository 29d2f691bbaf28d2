//! Configuration loader/writer plus strongly typed settings structures.
//!
//! config.toml lives in the data directory (~/.courtside or $COURTSIDE_DIR).
//! The embedded default is written out on first run so users have something
//! to edit; any section missing from the file falls back to its defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{GameCatalog, ListKind};

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

pub const DATA_DIR_ENV: &str = "COURTSIDE_DIR";

/// Top-level configuration object
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub start_list: ListKind,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_list: ListKind::Games,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    16 // ~60 FPS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationMode {
    #[default]
    Fixed,
    Denied,
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub mode: LocationMode,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_location_delay_ms")]
    pub delay_ms: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            mode: LocationMode::Fixed,
            latitude: default_latitude(),
            longitude: default_longitude(),
            delay_ms: default_location_delay_ms(),
        }
    }
}

// Downtown Chicago
fn default_latitude() -> f64 {
    41.8781
}

fn default_longitude() -> f64 {
    -87.6298
}

fn default_location_delay_ms() -> u64 {
    750
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Custom catalog file; the built-in catalog is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load config.toml from the data directory, extracting defaults first
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&Self::base_dir()?)
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::extract_defaults(dir)?;
        Self::load_from_path(&dir.join("config.toml"))
    }

    /// Load config from a custom file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save_to_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let path = dir.join("config.toml");
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, contents).context(format!("Failed to write config file: {:?}", path))?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Build the game catalog this config points at
    pub fn load_catalog(&self) -> Result<GameCatalog> {
        match &self.catalog.path {
            Some(path) => GameCatalog::load_from_file(path),
            None => GameCatalog::builtin(),
        }
    }

    /// Write config.toml if it does not exist yet
    fn extract_defaults(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .context(format!("Failed to create data directory: {:?}", dir))?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write config.toml")?;
            tracing::info!("Extracted default config to {:?}", config_path);
        }
        Ok(())
    }

    /// Get the base courtside directory (~/.courtside/)
    /// Can be overridden with COURTSIDE_DIR environment variable
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".courtside"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("courtside.log"))
    }
}
