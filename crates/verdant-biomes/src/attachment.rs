//! Deferred attachments: structures, decoration features and surface rules
//! that a biome node hands to the host once it is bound to a live biome.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::BiomeKey;

/// Identifier of a configured structure (e.g., "minecraft:nether_fortress").
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructureId(pub String);

/// Identifier of a placed feature (e.g., "verdant:crimson_vines").
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub String);

/// Generation step a feature is decorated in, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Decoration {
    RawGeneration,
    Lakes,
    LocalModifications,
    UndergroundStructures,
    SurfaceStructures,
    Strongholds,
    UndergroundOres,
    UndergroundDecoration,
    FluidSprings,
    VegetalDecoration,
    TopLayerModification,
}

/// Features per decoration step.
pub type FeatureMap = BTreeMap<Decoration, Vec<FeatureId>>;

/// A surface rule tree, evaluated by the host's surface builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SurfaceRule {
    /// Place this block.
    Block(String),
    /// First rule that applies wins.
    Sequence(Vec<SurfaceRule>),
    /// Apply `then` only inside `biome`.
    IfBiome {
        biome: BiomeKey,
        then: Box<SurfaceRule>,
    },
}

impl SurfaceRule {
    /// Wraps `then` in a biome condition.
    pub fn if_biome(biome: BiomeKey, then: SurfaceRule) -> Self {
        Self::IfBiome {
            biome,
            then: Box::new(then),
        }
    }
}

/// The host's registration API for biome attachments.
///
/// Calls are fire-and-forget. Resolution does no bookkeeping of its own, so
/// implementations should tolerate repeated identical calls across world
/// reloads.
pub trait BiomeHooks {
    /// Adds a structure to the live biome registered under `biome`.
    fn add_structure(&mut self, biome: &BiomeKey, structure: &StructureId);

    /// Adds features for one decoration step to the live biome `biome`.
    fn add_features(&mut self, biome: &BiomeKey, step: Decoration, features: &[FeatureId]);

    /// Registers a surface rule on behalf of the biome `owner`.
    fn add_surface_rule(&mut self, owner: &BiomeKey, rule: SurfaceRule);
}

/// One recorded [`BiomeHooks`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum HookCall {
    Structure {
        biome: BiomeKey,
        structure: StructureId,
    },
    Features {
        biome: BiomeKey,
        step: Decoration,
        features: Vec<FeatureId>,
    },
    SurfaceRule {
        owner: BiomeKey,
        rule: SurfaceRule,
    },
}

/// [`BiomeHooks`] implementation that records every call in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingHooks {
    pub calls: Vec<HookCall>,
}

impl RecordingHooks {
    /// Creates a recorder with no calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Structures attached to `biome`, in call order.
    pub fn structures_for(&self, biome: &BiomeKey) -> Vec<&StructureId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HookCall::Structure {
                    biome: b,
                    structure,
                } if b == biome => Some(structure),
                _ => None,
            })
            .collect()
    }

    /// Surface rules registered by `owner`, in call order.
    pub fn surface_rules_for(&self, owner: &BiomeKey) -> Vec<&SurfaceRule> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HookCall::SurfaceRule { owner: o, rule } if o == owner => Some(rule),
                _ => None,
            })
            .collect()
    }
}

impl BiomeHooks for RecordingHooks {
    fn add_structure(&mut self, biome: &BiomeKey, structure: &StructureId) {
        self.calls.push(HookCall::Structure {
            biome: biome.clone(),
            structure: structure.clone(),
        });
    }

    fn add_features(&mut self, biome: &BiomeKey, step: Decoration, features: &[FeatureId]) {
        self.calls.push(HookCall::Features {
            biome: biome.clone(),
            step,
            features: features.to_vec(),
        });
    }

    fn add_surface_rule(&mut self, owner: &BiomeKey, rule: SurfaceRule) {
        self.calls.push(HookCall::SurfaceRule {
            owner: owner.clone(),
            rule,
        });
    }
}
