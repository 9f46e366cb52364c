//! Nearest-node lookups for picking
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::graph::NodeId;

/// Wrapper around a 2D KD-tree for position-to-node queries
///
/// Provides O(log n) nearest-neighbor lookups to convert world positions
/// (from cursor picking, unit placement, etc.) into node ids. Built once
/// from the generated node positions, which are dense and never move, so
/// tree slot i is node id i.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 2, 32>,
}

impl SpatialIndex {
    /// Build the index from node positions in id order
    pub fn new(positions: &[Vec2]) -> Self {
        let points: Vec<[f32; 2]> = positions.iter().map(|p| [p.x, p.y]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Find the node nearest to a position
    ///
    /// # Example
    ///
    /// ```
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// use planar_continents::spatial::SpatialIndex;
    /// use glam::Vec2;
    ///
    /// let index = SpatialIndex::new(&[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
    /// assert_eq!(index.find_nearest(Vec2::new(9.0, 1.0)), 1);
    /// # }
    /// ```
    pub fn find_nearest(&self, position: Vec2) -> NodeId {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as NodeId
    }
}
