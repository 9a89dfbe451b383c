//! Process settings with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.ron";

/// Top-level process settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Debug/development settings.
    pub debug: DebugSettings,
    /// Biome sampling settings.
    pub generation: GenerationSettings,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugSettings {
    /// Log level filter (e.g., "debug", "info", "warn,verdant_biomes=trace").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub log_to_file: bool,
}

/// Settings for sampling the biome tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    /// Seed for the sampling RNG.
    pub seed: u64,
    /// Number of picks drawn when sampling the tree.
    pub samples: u32,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            samples: 10_000,
        }
    }
}

impl Settings {
    /// Load settings from the given directory, or create a default settings file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(SETTINGS_FILE_NAME);

        if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadError)?;
            let settings: Settings = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded settings from {}", path.display());
            Ok(settings)
        } else {
            let settings = Settings::default();
            settings.save(config_dir)?;
            log::info!("Created default settings at {}", path.display());
            Ok(settings)
        }
    }

    /// Save settings to the given directory as `settings.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(SETTINGS_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
