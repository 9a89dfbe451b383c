//! Resolution: binding design-time nodes to the live biomes of a world.
//!
//! Run once per world (re)load, after the live registry is built and before
//! any generation thread reads [`BiomeNode::actual_biome`](crate::BiomeNode::actual_biome).
//! The pass is post-order: sub-biomes and the edge resolve before their
//! parent. A key missing from the registry is logged and leaves that one node
//! unbound; the rest of the tree still resolves.

use hashbrown::HashSet;

use crate::{BiomeHooks, BiomeKey, BiomeLookup, BiomeTree, NodeHandle, SurfaceRule};

/// Outcome of a resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Nodes bound to a live biome.
    pub resolved: usize,
    /// Keys that had no live biome, in traversal order.
    pub missing: Vec<BiomeKey>,
}

impl ResolveReport {
    /// Returns `true` if every visited node was bound.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

struct Pass<'a, L: ?Sized, H: ?Sized> {
    registry: &'a L,
    hooks: &'a mut H,
    visited: HashSet<NodeHandle>,
    report: ResolveReport,
}

impl BiomeTree {
    /// Resolves `root` and everything reachable from it.
    pub fn resolve<L, H>(&mut self, root: NodeHandle, registry: &L, hooks: &mut H) -> ResolveReport
    where
        L: BiomeLookup + ?Sized,
        H: BiomeHooks + ?Sized,
    {
        let mut pass = Pass {
            registry,
            hooks,
            visited: HashSet::new(),
            report: ResolveReport::default(),
        };
        self.resolve_node(root, &mut pass);
        pass.report
    }

    /// Resolves every node in the tree exactly once.
    ///
    /// Roots are walked first. Nodes no root reaches (e.g. an edge that was
    /// later replaced) are then resolved on their own, in insertion order.
    pub fn resolve_all<L, H>(&mut self, registry: &L, hooks: &mut H) -> ResolveReport
    where
        L: BiomeLookup + ?Sized,
        H: BiomeHooks + ?Sized,
    {
        let mut pass = Pass {
            registry,
            hooks,
            visited: HashSet::new(),
            report: ResolveReport::default(),
        };
        for root in self.roots() {
            self.resolve_node(root, &mut pass);
        }
        let detached: Vec<NodeHandle> = self
            .handles()
            .filter(|handle| !pass.visited.contains(handle))
            .collect();
        for handle in detached {
            tracing::debug!(biome = %self[handle].key(), "resolving node unreachable from roots");
            self.resolve_node(handle, &mut pass);
        }
        tracing::info!(
            resolved = pass.report.resolved,
            missing = pass.report.missing.len(),
            "resolved biome tree"
        );
        pass.report
    }

    /// Drops every live binding, e.g. when a world unloads.
    pub fn clear_bindings(&mut self) {
        for node in &mut self.nodes {
            node.actual = None;
        }
    }

    fn resolve_node<L, H>(&mut self, handle: NodeHandle, pass: &mut Pass<'_, L, H>)
    where
        L: BiomeLookup + ?Sized,
        H: BiomeHooks + ?Sized,
    {
        let Some(node) = self.nodes.get(handle.index()) else {
            tracing::warn!(?handle, "skipping unknown node handle");
            return;
        };
        if !pass.visited.insert(handle) {
            return;
        }

        let children: Vec<NodeHandle> = node
            .sub_biomes
            .items()
            .copied()
            .filter(|&child| child != handle)
            .collect();
        let edge = node.edge.filter(|&edge| edge != handle);

        for child in children {
            self.resolve_node(child, pass);
        }
        if let Some(edge) = edge {
            self.resolve_node(edge, pass);
        }

        self.bind(handle, pass);
    }

    fn bind<L, H>(&mut self, handle: NodeHandle, pass: &mut Pass<'_, L, H>)
    where
        L: BiomeLookup + ?Sized,
        H: BiomeHooks + ?Sized,
    {
        let registry = pass.registry;
        let node = &mut self.nodes[handle.index()];
        node.actual = registry.lookup(node.key());
        let node = &self.nodes[handle.index()];

        let live_key = match node.actual {
            Some(id) => {
                pass.report.resolved += 1;
                let key = registry.key_of(id);
                if key.is_none() {
                    tracing::warn!(biome = %node.key(), ?id, "live biome has no registry key");
                }
                key
            }
            None => {
                tracing::error!(biome = %node.key(), "unable to find actual biome");
                pass.report.missing.push(node.key().clone());
                None
            }
        };

        if let Some(live_key) = live_key {
            for structure in node.structures() {
                pass.hooks.add_structure(live_key, structure);
            }
            for (step, features) in node.features() {
                if !features.is_empty() {
                    pass.hooks.add_features(live_key, *step, features);
                }
            }
        }

        if let Some(rule) = node.surface_rule() {
            match live_key {
                Some(live_key) => {
                    let scoped = SurfaceRule::if_biome(live_key.clone(), rule.clone());
                    pass.hooks.add_surface_rule(node.key(), scoped);
                }
                None => tracing::warn!(
                    biome = %node.key(),
                    "biome has no registry key, surface rule not registered"
                ),
            }
        }

        tracing::debug!(biome = %node.key(), bound = node.actual.is_some(), "resolved node");
    }
}
