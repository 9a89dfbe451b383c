//! Configuration for the Verdant biome toolkit.
//!
//! Two files live in the config directory, both as RON:
//!
//! - `settings.ron` holds process settings (log level, sampling seed) and can be
//!   overridden from the command line via clap.
//! - `biomes.ron` holds per-biome tunables grouped by `"{namespace}.{path}"`.
//!   Entries missing on first run are filled in with code defaults so the file
//!   documents every tunable after one launch.

mod biomes;
mod cli;
mod error;
mod settings;

pub use biomes::{BIOMES_FILE_NAME, BiomesConfig, ConfigValue};
pub use cli::CliArgs;
pub use error::ConfigError;
pub use settings::{DebugSettings, GenerationSettings, SETTINGS_FILE_NAME, Settings};

/// Returns the default config directory (`<platform config dir>/verdant`).
pub fn default_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("verdant"))
        .ok_or(ConfigError::NoConfigDir)
}
