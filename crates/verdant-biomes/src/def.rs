//! Biome definition: the design-time description of a single biome.

use serde::{Deserialize, Serialize};

use crate::BiomeKey;

/// Kind of precipitation falling in a biome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precipitation {
    #[default]
    None,
    Rain,
    Snow,
}

/// Full descriptor for a biome type, as declared by content code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeDef {
    /// Identifier the biome is registered under.
    pub key: BiomeKey,
    /// Base temperature; values below 0.15 allow snow.
    pub temperature: f32,
    /// Humidity in `[0.0, 1.0]`.
    pub downfall: f32,
    pub precipitation: Precipitation,
    /// Block placed on the terrain surface (e.g., "grass_block", "netherrack").
    pub surface_block: String,
    /// Block for the layers immediately below the surface.
    pub subsurface_block: String,
}

impl BiomeDef {
    /// Creates a temperate definition for `key`.
    pub fn new(key: BiomeKey) -> Self {
        Self {
            key,
            temperature: 0.8,
            downfall: 0.4,
            precipitation: Precipitation::Rain,
            surface_block: "grass_block".to_string(),
            subsurface_block: "dirt".to_string(),
        }
    }
}
