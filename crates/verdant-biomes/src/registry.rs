//! Live biome registry: the per-world mapping from [`BiomeKey`] to [`BiomeId`].
//!
//! A fresh registry is built every time a world loads; biome nodes are then
//! resolved against it.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{BiomeDef, BiomeKey};

/// Compact identifier of a biome inside one live registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiomeId(pub u16);

/// Read-only view of a live biome registry.
pub trait BiomeLookup {
    /// Returns the live biome registered under `key`.
    fn lookup(&self, key: &BiomeKey) -> Option<BiomeId>;

    /// Returns the key a live biome is registered under.
    fn key_of(&self, id: BiomeId) -> Option<&BiomeKey>;
}

/// Errors that can occur when registering biomes.
#[derive(Debug, thiserror::Error)]
pub enum BiomeRegistryError {
    /// A biome with this key is already registered.
    #[error("duplicate biome key: {0}")]
    DuplicateKey(BiomeKey),
    /// All 65 536 slots are in use.
    #[error("biome registry is full (max 65536 biomes)")]
    RegistryFull,
}

/// Stores the biome definitions of one world with O(1) lookup by ID and key.
pub struct BiomeRegistry {
    biomes: Vec<BiomeDef>,
    key_to_id: HashMap<BiomeKey, BiomeId>,
}

impl BiomeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            biomes: Vec::new(),
            key_to_id: HashMap::new(),
        }
    }

    /// Registers a biome definition, returning its assigned [`BiomeId`].
    ///
    /// # Errors
    ///
    /// Returns [`BiomeRegistryError::DuplicateKey`] if the key is taken, or
    /// [`BiomeRegistryError::RegistryFull`] once every ID is assigned.
    pub fn register(&mut self, def: BiomeDef) -> Result<BiomeId, BiomeRegistryError> {
        if self.key_to_id.contains_key(&def.key) {
            return Err(BiomeRegistryError::DuplicateKey(def.key));
        }
        let id = u16::try_from(self.biomes.len())
            .map(BiomeId)
            .map_err(|_| BiomeRegistryError::RegistryFull)?;
        self.key_to_id.insert(def.key.clone(), id);
        self.biomes.push(def);
        Ok(id)
    }

    /// Returns the definition for the given biome ID.
    pub fn get(&self, id: BiomeId) -> Option<&BiomeDef> {
        self.biomes.get(id.0 as usize)
    }

    /// Returns the number of registered biomes.
    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    /// Returns `true` if no biomes are registered.
    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }
}

impl BiomeLookup for BiomeRegistry {
    fn lookup(&self, key: &BiomeKey) -> Option<BiomeId> {
        self.key_to_id.get(key).copied()
    }

    fn key_of(&self, id: BiomeId) -> Option<&BiomeKey> {
        self.get(id).map(|def| &def.key)
    }
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
