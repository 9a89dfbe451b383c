//! Grouped per-biome tunables persisted as `biomes.ron`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the biome config inside the config directory.
pub const BIOMES_FILE_NAME: &str = "biomes.ron";

type Groups = BTreeMap<String, BTreeMap<String, ConfigValue>>;

/// A single stored tunable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ConfigValue {
    Float(f32),
    Int(i32),
    Bool(bool),
}

/// Biome tunables keyed by group (`"{namespace}.{path}"`) and entry name.
///
/// Reading an absent entry inserts the supplied default and marks the store
/// dirty; [`BiomesConfig::save_changes`] then writes the file so first-run
/// defaults become durable.
#[derive(Debug, Clone, Default)]
pub struct BiomesConfig {
    groups: Groups,
    dir: Option<PathBuf>,
    dirty: bool,
}

impl BiomesConfig {
    /// Creates a store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load `biomes.ron` from the given directory, or create an empty one.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(BIOMES_FILE_NAME);

        let existed = path.exists();
        let groups = if existed {
            let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadError)?;
            let groups: Groups = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!(
                "Loaded {} biome groups from {}",
                groups.len(),
                path.display()
            );
            groups
        } else {
            log::info!("Creating biome config at {}", path.display());
            Groups::new()
        };

        let config = Self {
            groups,
            dir: Some(config_dir.to_path_buf()),
            dirty: false,
        };
        if !existed {
            config.save(config_dir)?;
        }
        Ok(config)
    }

    /// Save all groups to the given directory as `biomes.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(&self.groups, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(BIOMES_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Writes pending changes to the attached directory.
    ///
    /// Does nothing when nothing changed or the store is in-memory.
    pub fn save_changes(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(dir) = &self.dir {
            self.save(dir)?;
        }
        self.dirty = false;
        Ok(())
    }

    /// Returns `true` if entries were added or changed since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reads a float entry, inserting `default` when absent.
    ///
    /// Integer entries are widened; any other type falls back to `default`.
    pub fn get_float(&mut self, group: &str, key: &str, default: f32) -> f32 {
        match self.entry_or_insert(group, key, ConfigValue::Float(default)) {
            ConfigValue::Float(v) => v,
            ConfigValue::Int(v) => v as f32,
            other => {
                log::warn!("{group}.{key} is {other:?}, expected a float; using {default}");
                default
            }
        }
    }

    /// Reads an integer entry, inserting `default` when absent.
    pub fn get_int(&mut self, group: &str, key: &str, default: i32) -> i32 {
        match self.entry_or_insert(group, key, ConfigValue::Int(default)) {
            ConfigValue::Int(v) => v,
            other => {
                log::warn!("{group}.{key} is {other:?}, expected an integer; using {default}");
                default
            }
        }
    }

    /// Reads a boolean entry, inserting `default` when absent.
    pub fn get_bool(&mut self, group: &str, key: &str, default: bool) -> bool {
        match self.entry_or_insert(group, key, ConfigValue::Bool(default)) {
            ConfigValue::Bool(v) => v,
            other => {
                log::warn!("{group}.{key} is {other:?}, expected a bool; using {default}");
                default
            }
        }
    }

    /// Overwrites an entry.
    pub fn set(&mut self, group: &str, key: &str, value: ConfigValue) {
        let previous = self
            .groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), value);
        if previous != Some(value) {
            self.dirty = true;
        }
    }

    /// Returns the stored entry without inserting anything.
    pub fn get(&self, group: &str, key: &str) -> Option<ConfigValue> {
        self.groups.get(group)?.get(key).copied()
    }

    /// Number of groups in the store.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if the store holds no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn entry_or_insert(&mut self, group: &str, key: &str, default: ConfigValue) -> ConfigValue {
        let entries = self.groups.entry(group.to_string()).or_default();
        match entries.get(key) {
            Some(value) => *value,
            None => {
                entries.insert(key.to_string(), default);
                self.dirty = true;
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_entry_inserts_default() {
        let mut config = BiomesConfig::in_memory();
        assert_eq!(config.get_float("verdant.plains", "fog_density", 0.5), 0.5);
        assert!(config.is_dirty());
        assert_eq!(
            config.get("verdant.plains", "fog_density"),
            Some(ConfigValue::Float(0.5))
        );
    }

    #[test]
    fn test_stored_value_wins_over_default() {
        let mut config = BiomesConfig::in_memory();
        config.set("verdant.plains", "edge_size", ConfigValue::Int(12));
        assert_eq!(config.get_int("verdant.plains", "edge_size", 0), 12);
    }

    #[test]
    fn test_type_mismatch_falls_back() {
        let mut config = BiomesConfig::in_memory();
        config.set("verdant.plains", "vertical", ConfigValue::Float(2.0));
        assert!(!config.get_bool("verdant.plains", "vertical", false));
        // Ints widen to floats.
        config.set("verdant.plains", "generation_chance", ConfigValue::Int(3));
        assert_eq!(config.get_float("verdant.plains", "generation_chance", 1.0), 3.0);
    }

    #[test]
    fn test_save_changes_clears_dirty_in_memory() {
        let mut config = BiomesConfig::in_memory();
        config.get_int("verdant.plains", "edge_size", 4);
        config.save_changes().unwrap();
        assert!(!config.is_dirty());
    }

    #[test]
    fn test_set_same_value_not_dirty() {
        let mut config = BiomesConfig::in_memory();
        config.set("g", "k", ConfigValue::Bool(true));
        config.save_changes().unwrap();
        config.set("g", "k", ConfigValue::Bool(true));
        assert!(!config.is_dirty());
    }

    #[test]
    fn test_defaults_persist_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BiomesConfig::load_or_create(dir.path()).unwrap();
        assert!(config.is_empty());
        config.get_float("verdant.crimson_forest", "generation_chance", 0.75);
        config.save_changes().unwrap();

        let mut reloaded = BiomesConfig::load_or_create(dir.path()).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(
            reloaded.get_float("verdant.crimson_forest", "generation_chance", 1.0),
            0.75
        );
        assert!(!reloaded.is_dirty());
    }

    #[test]
    fn test_hand_edited_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(BIOMES_FILE_NAME),
            "// tuned by hand\n{\"verdant.desert\": {\"fog_density\": Float(2.5)}}",
        )
        .unwrap();
        let mut config = BiomesConfig::load_or_create(dir.path()).unwrap();
        assert_eq!(config.get_float("verdant.desert", "fog_density", 1.0), 2.5);
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BIOMES_FILE_NAME), "{{not valid}}").unwrap();
        let result = BiomesConfig::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
