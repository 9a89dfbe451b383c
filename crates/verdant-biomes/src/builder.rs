//! Fluent construction of biome nodes.

use serde_json::Value;

use crate::{
    BiomeDef, BiomeKey, BiomeTree, BiomeTreeError, Decoration, FeatureId, FeatureMap,
    NodeHandle, Precipitation, StructureId, SurfaceRule,
};

/// Collects a definition, tunables and attachments, then inserts the node.
///
/// ```
/// use verdant_biomes::{BiomeBuilder, BiomeKey, BiomeTree, SurfaceRule};
///
/// let mut tree = BiomeTree::new();
/// let key = BiomeKey::new("verdant", "ash_plains").unwrap();
/// let handle = BiomeBuilder::start(key)
///     .temperature(2.0)
///     .fog_density(1.8)
///     .surface_rule(SurfaceRule::Block("basalt".into()))
///     .build(&mut tree)
///     .unwrap();
/// assert_eq!(tree[handle].fog_density(), 1.8);
/// ```
#[derive(Clone, Debug)]
pub struct BiomeBuilder {
    def: BiomeDef,
    generation_chance: f32,
    fog_density: f32,
    terrain_height: f32,
    edge_size: i32,
    vertical: bool,
    custom_data: Vec<(String, Value)>,
    structures: Vec<StructureId>,
    features: FeatureMap,
    surface_rule: Option<SurfaceRule>,
}

impl BiomeBuilder {
    /// Starts a builder for `key` with temperate defaults.
    pub fn start(key: BiomeKey) -> Self {
        Self {
            def: BiomeDef::new(key),
            generation_chance: 1.0,
            fog_density: 1.0,
            terrain_height: 0.1,
            edge_size: 0,
            vertical: false,
            custom_data: Vec::new(),
            structures: Vec::new(),
            features: FeatureMap::new(),
            surface_rule: None,
        }
    }

    /// Sets the base temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.def.temperature = temperature;
        self
    }

    /// Sets the humidity.
    pub fn downfall(mut self, downfall: f32) -> Self {
        self.def.downfall = downfall;
        self
    }

    /// Sets the precipitation kind.
    pub fn precipitation(mut self, precipitation: Precipitation) -> Self {
        self.def.precipitation = precipitation;
        self
    }

    /// Sets the top block and the blocks beneath it.
    pub fn surface(mut self, top: impl Into<String>, under: impl Into<String>) -> Self {
        self.def.surface_block = top.into();
        self.def.subsurface_block = under.into();
        self
    }

    /// Sets the weight among siblings.
    pub fn generation_chance(mut self, chance: f32) -> Self {
        self.generation_chance = chance;
        self
    }

    /// Sets the fog density multiplier.
    pub fn fog_density(mut self, density: f32) -> Self {
        self.fog_density = density;
        self
    }

    /// Sets the relative terrain height.
    pub fn terrain_height(mut self, height: f32) -> Self {
        self.terrain_height = height;
        self
    }

    /// Sets the edge band width in blocks.
    pub fn edge_size(mut self, size: i32) -> Self {
        self.edge_size = size;
        self
    }

    /// Marks the biome as vertically distributed.
    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    /// Adds a custom data entry.
    pub fn custom_data(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_data.push((name.into(), value.into()));
        self
    }

    /// Attaches a structure by id.
    pub fn structure(mut self, structure: impl Into<String>) -> Self {
        self.structures.push(StructureId(structure.into()));
        self
    }

    /// Adds a feature to one decoration step.
    pub fn feature(mut self, step: Decoration, feature: impl Into<String>) -> Self {
        self.features
            .entry(step)
            .or_default()
            .push(FeatureId(feature.into()));
        self
    }

    /// Sets the surface rule.
    pub fn surface_rule(mut self, rule: SurfaceRule) -> Self {
        self.surface_rule = Some(rule);
        self
    }

    /// Inserts the node into `tree`.
    ///
    /// # Errors
    ///
    /// Returns [`BiomeTreeError::DuplicateKey`] if the key is already in use.
    pub fn build(self, tree: &mut BiomeTree) -> Result<NodeHandle, BiomeTreeError> {
        let handle = tree.insert(self.def)?;
        let node = &mut tree[handle];
        node.set_generation_chance(self.generation_chance)
            .set_fog_density(self.fog_density)
            .set_terrain_height(self.terrain_height)
            .set_edge_size(self.edge_size)
            .set_vertical(self.vertical)
            .extend_custom_data(self.custom_data)
            .attach_structures(self.structures)
            .set_features(self.features);
        if let Some(rule) = self.surface_rule {
            node.set_surface_rule(rule);
        }
        Ok(handle)
    }
}
