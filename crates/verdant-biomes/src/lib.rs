//! Biome hierarchy: weighted sub-biome trees, binding to live registries, and
//! config-driven tunables.
//!
//! Content code builds a [`BiomeTree`] once at startup. Each world load builds
//! a fresh live registry and calls [`BiomeTree::resolve_all`]; generation
//! threads then draw biomes through a [`BiomePicker`] over the frozen tree.

mod attachment;
mod builder;
mod config;
mod def;
mod key;
mod node;
mod picker;
mod registry;
mod resolve;
mod tree;
mod weighted;

pub use attachment::{
    BiomeHooks, Decoration, FeatureId, FeatureMap, HookCall, RecordingHooks, StructureId,
    SurfaceRule,
};
pub use builder::BiomeBuilder;
pub use config::{ConfigStore, EDGE_SIZE, FOG_DENSITY, GENERATION_CHANCE};
pub use def::{BiomeDef, Precipitation};
pub use key::{BiomeKey, BiomeKeyError, DEFAULT_NAMESPACE};
pub use node::{BiomeNode, NodeHandle};
pub use picker::BiomePicker;
pub use registry::{BiomeId, BiomeLookup, BiomeRegistry, BiomeRegistryError};
pub use resolve::ResolveReport;
pub use tree::{BiomeTree, BiomeTreeError};
pub use weighted::{WeightedList, WeightedListError};
