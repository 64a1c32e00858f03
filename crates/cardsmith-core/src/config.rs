//! Editor configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! Serde is Rust's standard for serialization/deserialization.
//! The `#[derive(Serialize, Deserialize)]` macro generates
//! code to convert structs to/from JSON, TOML, etc.
//!
//! `#[serde(default)]` uses Default::default() for missing fields,
//! making configs backward-compatible.

use cardsmith_model::BubbleSize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::state::Device;

/// Main editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// New-session defaults
    pub editor: EditorConfig,

    /// Undo/redo settings
    pub history: HistoryConfig,

    /// Drop placement rules
    pub placement: PlacementConfig,
}

impl Config {
    /// Loads config from the default location.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Falling back to default config: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("cardsmith").join("config.toml"))
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }

    /// Saves the config to a file, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Defaults for a new editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Device a session starts on
    pub default_device: Device,

    /// Size token for newly created cards
    pub default_size: BubbleSize,

    /// Start sessions in live mode (embedded rendering)
    pub initial_live_mode: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_device: Device::Desktop,
            default_size: BubbleSize::Mega,
            initial_live_mode: false,
        }
    }
}

/// Undo/redo configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum snapshots kept per card (0 = unlimited)
    pub limit: usize,

    /// Record device/preview/live changes as undo steps.
    ///
    /// When false they are written into every snapshot instead, so undo
    /// and redo only walk through card edits and selections.
    pub record_mode_changes: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: 1000,
            record_mode_changes: true,
        }
    }
}

/// Drop placement configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Check placement rules before inserting dropped elements
    pub enforce: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self { enforce: true }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
