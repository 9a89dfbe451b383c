//! Biome nodes: one design-time biome plus its generation tunables, tree links
//! and deferred attachments.

use std::hash::{Hash, Hasher};

use hashbrown::HashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    BiomeDef, BiomeId, BiomeKey, Decoration, FeatureId, FeatureMap, StructureId, SurfaceRule,
    WeightedList,
};

/// Handle of a node inside a [`BiomeTree`](crate::BiomeTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub(crate) u32);

impl NodeHandle {
    /// Position of the node in its tree, in insertion order.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Handle for the node at `index`, or `None` past the last addressable slot.
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }
}

/// Wrapper around one [`BiomeDef`].
///
/// Nodes are created by [`BiomeTree::insert`](crate::BiomeTree::insert), which
/// seeds the sub-biome list with the node itself at weight 1.0: drawing a
/// sub-biome from a node without children yields the node. Links to other
/// nodes (`parent`, `edge`, sub-biomes) are handles into the owning tree and
/// are changed through tree methods only.
///
/// Two nodes are equal iff their keys are equal.
#[derive(Clone, Debug)]
pub struct BiomeNode {
    def: BiomeDef,
    handle: NodeHandle,
    pub(crate) actual: Option<BiomeId>,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) edge: Option<NodeHandle>,
    pub(crate) sub_biomes: WeightedList<NodeHandle>,

    generation_chance: f32,
    fog_density: f32,
    terrain_height: f32,
    edge_size: i32,
    vertical: bool,

    custom_data: HashMap<String, Value>,
    structures: Vec<StructureId>,
    features: FeatureMap,
    surface_rule: Option<SurfaceRule>,

    pub(crate) config_loaded: bool,
}

impl BiomeNode {
    pub(crate) fn new(handle: NodeHandle, def: BiomeDef) -> Self {
        let mut sub_biomes = WeightedList::new();
        sub_biomes.add(handle, 1.0);
        Self {
            def,
            handle,
            actual: None,
            parent: None,
            edge: None,
            sub_biomes,
            generation_chance: 1.0,
            fog_density: 1.0,
            terrain_height: 0.1,
            edge_size: 0,
            vertical: false,
            custom_data: HashMap::new(),
            structures: Vec::new(),
            features: FeatureMap::new(),
            surface_rule: None,
            config_loaded: false,
        }
    }

    /// Stable identifier of the biome.
    pub fn key(&self) -> &BiomeKey {
        &self.def.key
    }

    /// The design-time definition this node wraps.
    pub fn def(&self) -> &BiomeDef {
        &self.def
    }

    /// Handle of this node in its tree.
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    /// The live biome this node was bound to by the last resolution pass.
    ///
    /// `None` means the biome is unavailable in the current world, either
    /// because resolution has not run yet or because the registry lacks it.
    pub fn actual_biome(&self) -> Option<BiomeId> {
        self.actual
    }

    /// Returns `true` if the node is bound to a live biome.
    pub fn is_resolved(&self) -> bool {
        self.actual.is_some()
    }

    /// The node this one was last added to as a sub-biome or edge.
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// The edge biome, if one was set.
    pub fn edge(&self) -> Option<NodeHandle> {
        self.edge
    }

    /// Weighted sub-biome entries, starting with the node itself.
    pub fn sub_biomes(&self) -> &WeightedList<NodeHandle> {
        &self.sub_biomes
    }

    /// Group name of this biome in the config store.
    pub fn config_group(&self) -> String {
        self.def.key.config_group()
    }

    /// Returns `true` once config overrides have been applied.
    pub fn is_config_loaded(&self) -> bool {
        self.config_loaded
    }

    // --- Tunables ---

    /// Relative weight among siblings. Read when the node is added as a
    /// sub-biome or picker root; later changes do not reweight those entries.
    pub fn generation_chance(&self) -> f32 {
        self.generation_chance
    }

    /// Sets the generation chance.
    pub fn set_generation_chance(&mut self, chance: f32) -> &mut Self {
        self.generation_chance = chance;
        self
    }

    /// Fog density multiplier.
    pub fn fog_density(&self) -> f32 {
        self.fog_density
    }

    /// Sets the fog density multiplier.
    pub fn set_fog_density(&mut self, density: f32) -> &mut Self {
        self.fog_density = density;
        self
    }

    /// Relative terrain height for custom terrain generators.
    pub fn terrain_height(&self) -> f32 {
        self.terrain_height
    }

    /// Sets the relative terrain height.
    pub fn set_terrain_height(&mut self, height: f32) -> &mut Self {
        self.terrain_height = height;
        self
    }

    /// Width of the edge band in blocks.
    pub fn edge_size(&self) -> i32 {
        self.edge_size
    }

    /// Sets the edge band width in blocks.
    pub fn set_edge_size(&mut self, size: i32) -> &mut Self {
        self.edge_size = size;
        self
    }

    /// Whether the biome is distributed vertically (tall cave dimensions).
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// Sets whether the biome is distributed vertically.
    pub fn set_vertical(&mut self, vertical: bool) -> &mut Self {
        self.vertical = vertical;
        self
    }

    // --- Custom data ---

    /// Returns the raw custom value stored under `name`.
    pub fn custom_data(&self, name: &str) -> Option<&Value> {
        self.custom_data.get(name)
    }

    /// Reads a custom value as `T`, returning `default` when the entry is
    /// absent or has a different shape.
    pub fn custom_data_or<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        self.custom_data
            .get(name)
            .and_then(|value| T::deserialize(value).ok())
            .unwrap_or(default)
    }

    /// Stores a custom value, replacing any previous entry under `name`.
    pub fn add_custom_data(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.custom_data.insert(name.into(), value.into());
        self
    }

    /// Merges entries into the custom data; incoming entries win.
    pub fn extend_custom_data<I>(&mut self, data: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.custom_data.extend(data);
        self
    }

    // --- Deferred attachments ---

    /// Appends structures to attach once the node is bound.
    pub fn attach_structures<I>(&mut self, structures: I) -> &mut Self
    where
        I: IntoIterator<Item = StructureId>,
    {
        self.structures.extend(structures);
        self
    }

    /// Structures attached so far, in insertion order.
    pub fn structures(&self) -> &[StructureId] {
        &self.structures
    }

    /// Replaces the decoration features. They reach the host on resolution.
    pub fn set_features(&mut self, features: FeatureMap) -> &mut Self {
        self.features = features;
        self
    }

    /// Appends a feature to one decoration step.
    pub fn add_feature(&mut self, step: Decoration, feature: FeatureId) -> &mut Self {
        self.features.entry(step).or_default().push(feature);
        self
    }

    /// Features per decoration step.
    pub fn features(&self) -> &FeatureMap {
        &self.features
    }

    /// Sets the surface rule. It is registered on resolution, restricted to
    /// the resolved biome.
    pub fn set_surface_rule(&mut self, rule: SurfaceRule) -> &mut Self {
        self.surface_rule = Some(rule);
        self
    }

    /// The surface rule, if one was set.
    pub fn surface_rule(&self) -> Option<&SurfaceRule> {
        self.surface_rule.as_ref()
    }
}

impl PartialEq for BiomeNode {
    fn eq(&self, other: &Self) -> bool {
        self.def.key == other.def.key
    }
}

impl Eq for BiomeNode {}

impl Hash for BiomeNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.def.key.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(path: &str) -> BiomeNode {
        BiomeNode::new(
            NodeHandle(0),
            BiomeDef::new(BiomeKey::new("verdant", path).unwrap()),
        )
    }

    #[test]
    fn test_defaults() {
        let n = node("plains");
        assert_eq!(n.generation_chance(), 1.0);
        assert_eq!(n.fog_density(), 1.0);
        assert_eq!(n.terrain_height(), 0.1);
        assert_eq!(n.edge_size(), 0);
        assert!(!n.is_vertical());
        assert!(!n.is_resolved());
        assert!(!n.is_config_loaded());
        assert_eq!(n.parent(), None);
        assert_eq!(n.edge(), None);
    }

    #[test]
    fn test_handle_from_index() {
        assert_eq!(NodeHandle::from_index(7), Some(NodeHandle(7)));
        assert_eq!(
            NodeHandle::from_index(u32::MAX as usize),
            Some(NodeHandle(u32::MAX))
        );
        #[cfg(target_pointer_width = "64")]
        assert_eq!(NodeHandle::from_index(u32::MAX as usize + 1), None);
    }

    #[test]
    fn test_self_seeded_sub_biomes() {
        let n = node("plains");
        assert!(n.sub_biomes().contains(&n.handle()));
        assert_eq!(n.sub_biomes().len(), 1);
        assert_eq!(n.sub_biomes().total_weight(), 1.0);
    }

    #[test]
    fn test_setters_chain() {
        let mut n = node("basalt_deltas");
        n.set_fog_density(2.5)
            .set_terrain_height(0.4)
            .set_vertical(true)
            .set_edge_size(6);
        assert_eq!(n.fog_density(), 2.5);
        assert_eq!(n.terrain_height(), 0.4);
        assert!(n.is_vertical());
        assert_eq!(n.edge_size(), 6);
    }

    #[test]
    fn test_equality_by_key() {
        let a = node("plains");
        let mut b = BiomeNode::new(
            NodeHandle(5),
            BiomeDef::new(BiomeKey::new("verdant", "plains").unwrap()),
        );
        b.set_fog_density(9.0);
        assert_eq!(a, b);
        assert_ne!(a, node("desert"));
    }

    #[test]
    fn test_custom_data_merge() {
        let mut n = node("plains");
        n.add_custom_data("has_rivers", true)
            .add_custom_data("tint", 0x7f_b2_38);
        n.extend_custom_data([
            ("tint".to_string(), json!(0x11_22_33)),
            ("ambient".to_string(), json!("wind")),
        ]);

        assert_eq!(n.custom_data("has_rivers"), Some(&json!(true)));
        assert_eq!(n.custom_data_or("tint", 0u32), 0x11_22_33);
        assert_eq!(n.custom_data_or("ambient", String::new()), "wind");
        assert_eq!(n.custom_data_or("missing", 3i32), 3);
        // Wrong shape falls back too.
        assert_eq!(n.custom_data_or("ambient", 1.5f32), 1.5);
    }

    #[test]
    fn test_attachments_accumulate() {
        let mut n = node("crimson_forest");
        n.attach_structures([StructureId("minecraft:bastion_remnant".into())]);
        n.attach_structures([StructureId("minecraft:nether_fossil".into())]);
        n.add_feature(
            Decoration::VegetalDecoration,
            FeatureId("verdant:crimson_roots".into()),
        );
        n.set_surface_rule(SurfaceRule::Block("crimson_nylium".into()));

        assert_eq!(n.structures().len(), 2);
        assert_eq!(n.features()[&Decoration::VegetalDecoration].len(), 1);
        assert_eq!(
            n.surface_rule(),
            Some(&SurfaceRule::Block("crimson_nylium".into()))
        );
    }
}
