//! Insertion-ordered weighted list with proportional random draws.

use rand::Rng;
use thiserror::Error;

/// Errors returned by [`WeightedList::pick`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WeightedListError {
    /// The list has no entries to draw from.
    #[error("cannot pick from an empty weighted list")]
    Empty,
}

/// An ordered sequence of `(item, weight)` pairs.
///
/// Weights are probability mass, normalized against the running total only
/// when drawing. Duplicate items are kept as separate entries, so adding the
/// same item twice raises its share of draws.
#[derive(Clone, Debug)]
pub struct WeightedList<T> {
    entries: Vec<(T, f64)>,
    total: f64,
}

impl<T> WeightedList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            total: 0.0,
        }
    }

    /// Appends `item` with the given weight.
    ///
    /// Negative and non-finite weights are stored as `0.0`.
    pub fn add(&mut self, item: T, weight: f64) {
        let weight = if weight.is_finite() && weight >= 0.0 {
            weight
        } else {
            tracing::warn!(weight, "invalid weight clamped to zero");
            0.0
        };
        self.total += weight;
        self.entries.push((item, weight));
    }

    /// Draws an item with probability proportional to its weight.
    ///
    /// When every weight is zero the first entry is returned.
    ///
    /// # Errors
    ///
    /// Returns [`WeightedListError::Empty`] if the list has no entries.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Result<&T, WeightedListError> {
        let (first, _) = self.entries.first().ok_or(WeightedListError::Empty)?;
        if self.total <= 0.0 {
            return Ok(first);
        }

        let mut roll = rng.random::<f64>() * self.total;
        let mut last_weighted = first;
        for (item, weight) in &self.entries {
            if *weight <= 0.0 {
                continue;
            }
            if roll < *weight {
                return Ok(item);
            }
            roll -= *weight;
            last_weighted = item;
        }

        // Float slack on the final subtraction.
        Ok(last_weighted)
    }

    /// Returns `true` if any entry equals `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.entries.iter().any(|(entry, _)| entry == item)
    }

    /// Iterates `(item, weight)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> {
        self.entries.iter().map(|(item, weight)| (item, *weight))
    }

    /// Iterates items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(item, _)| item)
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.total
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for WeightedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(T, f64)> for WeightedList<T> {
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (item, weight) in iter {
            list.add(item, weight);
        }
        list
    }
}
