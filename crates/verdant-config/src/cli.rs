//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Settings;

/// Verdant command-line arguments.
///
/// CLI values override settings loaded from `settings.ron`.
#[derive(Parser, Debug)]
#[command(name = "verdant", about = "Biome hierarchy sampler")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Seed for the sampling RNG.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of picks to draw.
    #[arg(long)]
    pub samples: Option<u32>,
}

impl Settings {
    /// Apply CLI overrides to loaded settings.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(seed) = args.seed {
            self.generation.seed = seed;
        }
        if let Some(samples) = args.samples {
            self.generation.samples = samples;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut settings = Settings::default();
        let args = CliArgs::parse_from(["verdant", "--seed", "77", "--log-level", "debug"]);
        settings.apply_cli_overrides(&args);
        assert_eq!(settings.generation.seed, 77);
        assert_eq!(settings.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(settings.generation.samples, 10_000);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Settings::default();
        let mut settings = Settings::default();
        let args = CliArgs::parse_from(["verdant"]);
        settings.apply_cli_overrides(&args);
        assert_eq!(settings, original);
    }

    #[test]
    fn test_cli_config_dir() {
        let args = CliArgs::parse_from(["verdant", "--config", "/tmp/verdant"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/verdant")));
    }
}
