//! Spatial indexing for efficient neighbor queries.
//!
//! Wraps a KD-tree over agent positions. Indices returned by queries point
//! into the slice the index was built from.

use kdtree::distance::squared_euclidean;
use kdtree::{ErrorKind as KdTreeError, KdTree};
use ndarray::Array1;

use super::locatable::Locatable;

/// Type alias for 2D spatial KD-tree used for efficient neighbor queries.
pub type Tree2D = KdTree<f32, usize, Vec<f32>>;

/// Result of a spatial radius query: (`distance_squared`, index) pairs.
pub type SpatialQueryResult = Vec<(f32, usize)>;

/// KD-tree over the positions of a filtered set of agents.
pub struct SpatialIndex {
    tree: Tree2D,
    len: usize,
}

impl SpatialIndex {
    /// Builds an index over every item accepted by `include`.
    ///
    /// # Arguments
    ///
    /// * `items` - Items to index
    /// * `include` - Filter, e.g. "alive predators only"
    pub fn build<T: Locatable>(
        items: &[T],
        include: impl Fn(&T) -> bool,
    ) -> Result<Self, KdTreeError> {
        let mut tree = KdTree::with_capacity(2, items.len().max(1));
        let mut len = 0;
        for (i, item) in items.iter().enumerate().filter(|(_, item)| include(item)) {
            tree.add(item.pos().to_vec(), i)?;
            len += 1;
        }
        Ok(Self { tree, len })
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the item closest to `pos`.
    pub fn nearest(&self, pos: &Array1<f32>) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.tree
            .nearest(&pos.to_vec(), 1, &squared_euclidean)
            .ok()?
            .first()
            .map(|&(_, &idx)| idx)
    }

    /// Items within `radius` of `pos`, closest first.
    pub fn within(&self, pos: &Array1<f32>, radius: f32) -> SpatialQueryResult {
        self.tree
            .within(&pos.to_vec(), radius.powi(2), &squared_euclidean)
            .unwrap_or_default()
            .into_iter()
            .map(|(dist, &idx)| (dist, idx))
            .collect()
    }
}
