//! One-shot application of persisted per-biome overrides.

use verdant_config::{BiomesConfig, ConfigError};

use crate::{BiomeNode, BiomeTree};

/// Config entry holding a biome's generation chance.
pub const GENERATION_CHANCE: &str = "generation_chance";
/// Config entry holding a biome's fog density.
pub const FOG_DENSITY: &str = "fog_density";
/// Config entry holding a biome's edge size; only read for biomes with an edge.
pub const EDGE_SIZE: &str = "edge_size";

/// Grouped key/value store the overrides are read from.
///
/// Getters return the stored value, or `default` when the entry is absent or
/// unreadable. Stores may record the default so it is persisted on the next
/// [`ConfigStore::save_changes`].
pub trait ConfigStore {
    fn get_float(&mut self, group: &str, key: &str, default: f32) -> f32;
    fn get_int(&mut self, group: &str, key: &str, default: i32) -> i32;
    fn save_changes(&mut self) -> Result<(), ConfigError>;
}

impl ConfigStore for BiomesConfig {
    fn get_float(&mut self, group: &str, key: &str, default: f32) -> f32 {
        BiomesConfig::get_float(self, group, key, default)
    }

    fn get_int(&mut self, group: &str, key: &str, default: i32) -> i32 {
        BiomesConfig::get_int(self, group, key, default)
    }

    fn save_changes(&mut self) -> Result<(), ConfigError> {
        BiomesConfig::save_changes(self)
    }
}

impl BiomeNode {
    /// Applies stored overrides for chance, fog density and (when the node has
    /// an edge) edge size, then asks the store to persist.
    ///
    /// Runs at most once per node; later calls return immediately. Stored
    /// values replace the node's current ones. Sub-biome entries that already
    /// hold this node keep the weight they were added with.
    pub fn setup_from_config<S: ConfigStore + ?Sized>(&mut self, store: &mut S) -> &mut Self {
        if self.config_loaded {
            return self;
        }
        self.config_loaded = true;

        let group = self.config_group();
        let chance = store.get_float(&group, GENERATION_CHANCE, self.generation_chance());
        let fog = store.get_float(&group, FOG_DENSITY, self.fog_density());
        self.set_generation_chance(chance).set_fog_density(fog);

        if self.edge.is_some() {
            let edge_size = store.get_int(&group, EDGE_SIZE, self.edge_size());
            self.set_edge_size(edge_size);
        }

        if let Err(err) = store.save_changes() {
            tracing::warn!(biome = %self.key(), %err, "failed to persist biome config");
        }
        self
    }
}

impl BiomeTree {
    /// Applies config overrides to every node, in insertion order.
    pub fn setup_all_from_config<S: ConfigStore + ?Sized>(&mut self, store: &mut S) {
        for node in &mut self.nodes {
            node.setup_from_config(store);
        }
    }
}
