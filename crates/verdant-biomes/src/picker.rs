//! Top-level biome selection: a weighted draw among root biomes, followed by a
//! sub-biome draw inside the chosen root.

use rand::Rng;

use crate::{BiomeId, BiomeTree, NodeHandle, WeightedList};

/// Weighted selection over a set of root biomes.
///
/// Root weights are the generation chances at the time each root was added,
/// so build the picker after config overrides have been applied.
#[derive(Clone, Debug, Default)]
pub struct BiomePicker {
    roots: WeightedList<NodeHandle>,
}

impl BiomePicker {
    /// Creates an empty picker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a picker over every root of `tree`.
    pub fn from_roots(tree: &BiomeTree) -> Self {
        let mut picker = Self::new();
        for root in tree.roots() {
            picker.add(tree, root);
        }
        picker
    }

    /// Adds `handle` weighted by its current generation chance.
    pub fn add(&mut self, tree: &BiomeTree, handle: NodeHandle) {
        let Some(node) = tree.get(handle) else {
            tracing::warn!(?handle, "ignoring unknown node handle");
            return;
        };
        self.roots.add(handle, f64::from(node.generation_chance()));
    }

    /// Draws a root biome. Returns `None` if the picker is empty.
    pub fn pick_root<R: Rng>(&self, rng: &mut R) -> Option<NodeHandle> {
        self.roots.pick(rng).ok().copied()
    }

    /// Draws a root, then one of its sub-biomes (possibly the root itself).
    pub fn pick<R: Rng>(&self, tree: &BiomeTree, rng: &mut R) -> Option<NodeHandle> {
        let root = self.pick_root(rng)?;
        Some(tree.pick_sub_biome(root, rng))
    }

    /// Like [`BiomePicker::pick`], but returns the live biome.
    ///
    /// Returns `None` when the drawn node is unresolved in the current world.
    pub fn pick_live<R: Rng>(&self, tree: &BiomeTree, rng: &mut R) -> Option<BiomeId> {
        let picked = self.pick(tree, rng)?;
        tree[picked].actual_biome()
    }

    /// Number of root entries.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns `true` if the picker has no roots.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BiomeDef, BiomeKey, BiomeLookup, BiomeRegistry, RecordingHooks};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn insert(tree: &mut BiomeTree, path: &str, chance: f32) -> NodeHandle {
        let handle = tree
            .insert(BiomeDef::new(BiomeKey::new("verdant", path).unwrap()))
            .unwrap();
        tree[handle].set_generation_chance(chance);
        handle
    }

    #[test]
    fn test_empty_picker() {
        let tree = BiomeTree::new();
        let picker = BiomePicker::from_roots(&tree);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(picker.is_empty());
        assert_eq!(picker.pick(&tree, &mut rng), None);
    }

    #[test]
    fn test_roots_drawn_by_chance() {
        let mut tree = BiomeTree::new();
        let common = insert(&mut tree, "common", 3.0);
        let rare = insert(&mut tree, "rare", 1.0);
        let sub = insert(&mut tree, "rare_sub", 1.0);
        tree.add_sub_biome(rare, sub).unwrap();

        let picker = BiomePicker::from_roots(&tree);
        assert_eq!(picker.len(), 2);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let draws = 40_000;
        let commons = (0..draws)
            .filter(|_| picker.pick_root(&mut rng) == Some(common))
            .count();
        let share = commons as f64 / draws as f64;
        assert!((share - 0.75).abs() < 0.015, "got {share}");
    }

    #[test]
    fn test_pick_reaches_sub_biomes() {
        let mut tree = BiomeTree::new();
        let root = insert(&mut tree, "root", 1.0);
        let sub = insert(&mut tree, "sub", 1.0);
        tree.add_sub_biome(root, sub).unwrap();

        let picker = BiomePicker::from_roots(&tree);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let picks: Vec<_> = (0..200).map(|_| picker.pick(&tree, &mut rng)).collect();
        assert!(picks.contains(&Some(root)));
        assert!(picks.contains(&Some(sub)));
    }

    #[test]
    fn test_pick_live_skips_unresolved() {
        let mut tree = BiomeTree::new();
        let root = insert(&mut tree, "root", 1.0);
        let picker = BiomePicker::from_roots(&tree);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(picker.pick_live(&tree, &mut rng), None);

        let mut registry = BiomeRegistry::new();
        registry.register(tree[root].def().clone()).unwrap();
        tree.resolve_all(&registry, &mut RecordingHooks::new());
        assert_eq!(
            picker.pick_live(&tree, &mut rng),
            registry.lookup(tree[root].key())
        );
    }
}
