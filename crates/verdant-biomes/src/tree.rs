//! Arena of biome nodes and the operations that link them.
//!
//! Nodes own their forward links (sub-biomes, edge) as handles; the parent
//! link is a plain back-reference. Linking is rejected when it would make a
//! node reachable from itself, so every traversal over forward links ends.

use std::ops::{Index, IndexMut};

use hashbrown::{HashMap, HashSet};
use rand::Rng;
use thiserror::Error;

use crate::{BiomeDef, BiomeKey, BiomeNode, NodeHandle};

/// Errors raised while building a [`BiomeTree`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BiomeTreeError {
    /// A node with this key already exists in the tree.
    #[error("duplicate biome key: {0}")]
    DuplicateKey(BiomeKey),
    /// The handle does not belong to this tree.
    #[error("unknown node handle: {0:?}")]
    UnknownHandle(NodeHandle),
    /// A node cannot be its own edge.
    #[error("biome {0} cannot be its own edge")]
    SelfEdge(BiomeKey),
    /// `parent` is reachable from `child`; linking them would loop.
    #[error("linking {child} under {parent} would create a cycle")]
    Cycle { parent: BiomeKey, child: BiomeKey },
    /// Every node handle is in use.
    #[error("biome tree is full (max {} nodes)", u32::MAX)]
    TreeFull,
}

/// Owns every [`BiomeNode`] of a content pack.
///
/// Build the tree single-threaded during content definition. Once frozen it
/// can be shared across generation threads; draws only need `&self`.
#[derive(Debug, Default)]
pub struct BiomeTree {
    pub(crate) nodes: Vec<BiomeNode>,
    by_key: HashMap<BiomeKey, NodeHandle>,
}

impl BiomeTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `def` in a new node.
    ///
    /// # Errors
    ///
    /// Returns [`BiomeTreeError::DuplicateKey`] if the key is already present,
    /// or [`BiomeTreeError::TreeFull`] once every handle is assigned.
    pub fn insert(&mut self, def: BiomeDef) -> Result<NodeHandle, BiomeTreeError> {
        if self.by_key.contains_key(&def.key) {
            return Err(BiomeTreeError::DuplicateKey(def.key));
        }
        let handle = NodeHandle::from_index(self.nodes.len()).ok_or(BiomeTreeError::TreeFull)?;
        self.by_key.insert(def.key.clone(), handle);
        self.nodes.push(BiomeNode::new(handle, def));
        Ok(handle)
    }

    /// Returns the node for `handle`, if it belongs to this tree.
    pub fn get(&self, handle: NodeHandle) -> Option<&BiomeNode> {
        self.nodes.get(handle.index())
    }

    /// Mutable variant of [`BiomeTree::get`].
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut BiomeNode> {
        self.nodes.get_mut(handle.index())
    }

    /// Looks up the handle of the node registered under `key`.
    pub fn get_by_key(&self, key: &BiomeKey) -> Option<NodeHandle> {
        self.by_key.get(key).copied()
    }

    /// Handles of all nodes in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.nodes.iter().map(BiomeNode::handle)
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &BiomeNode> {
        self.nodes.iter()
    }

    /// Nodes that were never added as a sub-biome or edge.
    pub fn roots(&self) -> Vec<NodeHandle> {
        self.nodes
            .iter()
            .filter(|node| node.parent.is_none())
            .map(BiomeNode::handle)
            .collect()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds `child` to `parent`'s sub-biomes, weighted by the child's current
    /// generation chance, and points `child`'s parent at `parent`.
    ///
    /// Adding the same child twice adds a second entry. Adding a node to
    /// itself only adds another self entry; its parent link is left alone.
    pub fn add_sub_biome(
        &mut self,
        parent: NodeHandle,
        child: NodeHandle,
    ) -> Result<(), BiomeTreeError> {
        self.check(parent)?;
        self.check(child)?;
        if parent != child && self.reaches(child, parent) {
            return Err(self.cycle(parent, child));
        }

        let weight = f64::from(self.nodes[child.index()].generation_chance());
        if parent != child {
            self.nodes[child.index()].parent = Some(parent);
        }
        self.nodes[parent.index()].sub_biomes.add(child, weight);
        tracing::trace!(
            parent = %self.nodes[parent.index()].key(),
            child = %self.nodes[child.index()].key(),
            weight,
            "added sub-biome"
        );
        Ok(())
    }

    /// Makes `edge` the edge biome of `node` and `node` the parent of `edge`.
    ///
    /// A previous edge of `node` keeps its parent link.
    pub fn set_edge(&mut self, node: NodeHandle, edge: NodeHandle) -> Result<(), BiomeTreeError> {
        self.check(node)?;
        self.check(edge)?;
        if node == edge {
            return Err(BiomeTreeError::SelfEdge(self.nodes[node.index()].key().clone()));
        }
        if self.reaches(edge, node) {
            return Err(self.cycle(node, edge));
        }

        self.nodes[node.index()].edge = Some(edge);
        self.nodes[edge.index()].parent = Some(node);
        Ok(())
    }

    /// Returns `true` if `other` is one of `node`'s sub-biome entries,
    /// including `node` itself.
    pub fn contains_sub_biome(&self, node: NodeHandle, other: NodeHandle) -> bool {
        self.get(node)
            .is_some_and(|n| n.sub_biomes.contains(&other))
    }

    /// Draws a sub-biome of `node`, which may be `node` itself.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not belong to this tree.
    pub fn pick_sub_biome<R: Rng>(&self, node: NodeHandle, rng: &mut R) -> NodeHandle {
        // Self-seeding keeps the list non-empty.
        self[node].sub_biomes.pick(rng).copied().unwrap_or(node)
    }

    /// Returns `true` if `other` is `node` or a direct sub-biome/edge of it.
    ///
    /// Only the immediate parent link is checked; grandchildren do not match.
    pub fn is_same(&self, node: NodeHandle, other: NodeHandle) -> bool {
        node == other || self.get(other).and_then(|o| o.parent) == Some(node)
    }

    /// The node `node` was last linked under, if any.
    pub fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.get(node).and_then(|n| n.parent)
    }

    /// The edge biome of `node`, if any.
    pub fn edge(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.get(node).and_then(|n| n.edge)
    }

    fn check(&self, handle: NodeHandle) -> Result<(), BiomeTreeError> {
        if handle.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(BiomeTreeError::UnknownHandle(handle))
        }
    }

    fn cycle(&self, parent: NodeHandle, child: NodeHandle) -> BiomeTreeError {
        BiomeTreeError::Cycle {
            parent: self.nodes[parent.index()].key().clone(),
            child: self.nodes[child.index()].key().clone(),
        }
    }

    /// Depth-first search over sub-biome and edge links.
    fn reaches(&self, from: NodeHandle, target: NodeHandle) -> bool {
        let mut stack = vec![from];
        let mut visited = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            let node = &self.nodes[current.index()];
            stack.extend(node.sub_biomes.items().copied().filter(|&h| h != current));
            stack.extend(node.edge);
        }
        false
    }
}

impl Index<NodeHandle> for BiomeTree {
    type Output = BiomeNode;

    fn index(&self, handle: NodeHandle) -> &BiomeNode {
        &self.nodes[handle.index()]
    }
}

impl IndexMut<NodeHandle> for BiomeTree {
    fn index_mut(&mut self, handle: NodeHandle) -> &mut BiomeNode {
        &mut self.nodes[handle.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn insert(tree: &mut BiomeTree, path: &str) -> NodeHandle {
        tree.insert(BiomeDef::new(BiomeKey::new("verdant", path).unwrap()))
            .unwrap()
    }

    #[test]
    fn test_insert_seeds_self() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        assert!(tree.contains_sub_biome(a, a));
        assert_eq!(tree.get_by_key(tree[a].key()), Some(a));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut tree = BiomeTree::new();
        insert(&mut tree, "a");
        let result = tree.insert(BiomeDef::new(BiomeKey::new("verdant", "a").unwrap()));
        assert!(matches!(result, Err(BiomeTreeError::DuplicateKey(_))));
    }

    #[test]
    fn test_add_sub_biome_links_both_sides() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        let b = insert(&mut tree, "b");
        tree[b].set_generation_chance(0.25);
        tree.add_sub_biome(a, b).unwrap();

        assert_eq!(tree.parent(b), Some(a));
        assert!(tree.contains_sub_biome(a, b));
        assert!(!tree.contains_sub_biome(b, a));
        let weights: Vec<_> = tree[a].sub_biomes().iter().map(|(h, w)| (*h, w)).collect();
        assert_eq!(weights, [(a, 1.0), (b, 0.25)]);
    }

    #[test]
    fn test_weight_read_at_insertion() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        let b = insert(&mut tree, "b");
        tree.add_sub_biome(a, b).unwrap();
        tree[b].set_generation_chance(5.0);
        assert_eq!(tree[a].sub_biomes().total_weight(), 2.0);
    }

    #[test]
    fn test_set_edge_bidirectional() {
        let mut tree = BiomeTree::new();
        let n = insert(&mut tree, "n");
        let e = insert(&mut tree, "n_edge");
        tree.set_edge(n, e).unwrap();
        assert_eq!(tree.edge(n), Some(e));
        assert_eq!(tree.parent(e), Some(n));
    }

    #[test]
    fn test_replacing_edge() {
        let mut tree = BiomeTree::new();
        let n = insert(&mut tree, "n");
        let e1 = insert(&mut tree, "e1");
        let e2 = insert(&mut tree, "e2");
        tree.set_edge(n, e1).unwrap();
        tree.set_edge(n, e2).unwrap();
        assert_eq!(tree.edge(n), Some(e2));
        assert_eq!(tree.parent(e2), Some(n));
        // The old edge is not unlinked.
        assert_eq!(tree.parent(e1), Some(n));
    }

    #[test]
    fn test_self_edge_rejected() {
        let mut tree = BiomeTree::new();
        let n = insert(&mut tree, "n");
        assert!(matches!(
            tree.set_edge(n, n),
            Err(BiomeTreeError::SelfEdge(_))
        ));
        assert_eq!(tree.edge(n), None);
    }

    #[test]
    fn test_cycles_rejected() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        let b = insert(&mut tree, "b");
        let c = insert(&mut tree, "c");
        tree.set_edge(a, b).unwrap();
        assert!(matches!(tree.set_edge(b, a), Err(BiomeTreeError::Cycle { .. })));

        tree.add_sub_biome(b, c).unwrap();
        assert!(matches!(
            tree.add_sub_biome(c, a),
            Err(BiomeTreeError::Cycle { .. })
        ));
        // Failed links leave the topology untouched.
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree[c].sub_biomes().len(), 1);
    }

    #[test]
    fn test_self_sub_biome_adds_duplicate_entry() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        tree[a].set_generation_chance(0.5);
        tree.add_sub_biome(a, a).unwrap();

        assert_eq!(tree[a].sub_biomes().len(), 2);
        assert_eq!(tree[a].sub_biomes().total_weight(), 1.5);
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.roots(), [a]);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(tree.pick_sub_biome(a, &mut rng), a);
        }
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        let foreign = NodeHandle(42);
        assert_eq!(
            tree.add_sub_biome(a, foreign),
            Err(BiomeTreeError::UnknownHandle(foreign))
        );
        assert!(!tree.contains_sub_biome(foreign, a));
    }

    #[test]
    fn test_is_same_is_shallow() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        let b = insert(&mut tree, "b");
        let c = insert(&mut tree, "c");
        let e = insert(&mut tree, "a_edge");
        tree.add_sub_biome(a, b).unwrap();
        tree.add_sub_biome(b, c).unwrap();
        tree.set_edge(a, e).unwrap();

        assert!(tree.is_same(a, a));
        assert!(tree.is_same(a, b));
        assert!(tree.is_same(a, e));
        assert!(!tree.is_same(a, c));
        assert!(!tree.is_same(b, a));
    }

    #[test]
    fn test_roots_exclude_children_and_edges() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        let b = insert(&mut tree, "b");
        let e = insert(&mut tree, "e");
        let d = insert(&mut tree, "d");
        tree.add_sub_biome(a, b).unwrap();
        tree.set_edge(a, e).unwrap();
        assert_eq!(tree.roots(), [a, d]);
    }

    #[test]
    fn test_pick_without_children_returns_self() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(tree.pick_sub_biome(a, &mut rng), a);
        }
    }

    #[test]
    fn test_pick_ratio_between_children() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        let b = insert(&mut tree, "b");
        let c = insert(&mut tree, "c");
        tree[b].set_generation_chance(0.25);
        tree[c].set_generation_chance(0.75);
        tree.add_sub_biome(a, b).unwrap();
        tree.add_sub_biome(a, c).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let (mut bs, mut cs) = (0u32, 0u32);
        for _ in 0..10_000 {
            let picked = tree.pick_sub_biome(a, &mut rng);
            if picked == b {
                bs += 1;
            } else if picked == c {
                cs += 1;
            }
        }
        let ratio = f64::from(cs) / f64::from(bs);
        assert!((ratio - 3.0).abs() < 0.4, "expected ~1:3, got {bs}:{cs}");
    }

    #[test]
    fn test_concurrent_picks_on_frozen_tree() {
        let mut tree = BiomeTree::new();
        let a = insert(&mut tree, "a");
        let b = insert(&mut tree, "b");
        tree.add_sub_biome(a, b).unwrap();
        let tree = tree;

        let sequences: Vec<Vec<NodeHandle>> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        let mut rng = ChaCha8Rng::seed_from_u64(77);
                        (0..256)
                            .map(|_| tree.pick_sub_biome(a, &mut rng))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert!(sequences.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
