//! Continent extraction by randomized boundary walks
//!
//! A walk starts at a random anchor node and follows random adjacencies,
//! staying spatially near the anchor and never revisiting interior path
//! nodes. When the walk reaches a node already on the path, the prefix
//! before that node's first occurrence is trimmed away and the remainder
//! becomes a closed continent polygon. Dead ends and over-long walks
//! abandon the attempt; the driving loop simply retries with a fresh
//! anchor, bounded by an attempt budget.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec2;
use log::trace;
use rand::Rng;

use crate::graph::{Graph, NodeId};
use crate::grid::PartitionGrid;

/// A closed continent polygon
///
/// Regions are immutable once produced. `order` is the generation-order
/// tag consumed by external shading; it carries no geometric meaning.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Closed boundary, one point per walked node, first point implicitly
    /// connected to the last
    pub points: Vec<Vec2>,
    /// Zero-based extraction order
    pub order: usize,
}

impl Region {
    /// Number of polygon sides (equal to the point count, as the boundary
    /// closes back onto its first point)
    #[inline]
    pub fn side_count(&self) -> usize {
        self.points.len()
    }
}

/// Inputs to the boundary walk
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    /// Closures at or below this path length are abandoned, as are repeats
    /// first occurring inside a trailing window of this many steps
    pub min_region_sides: usize,
    /// Walk length budget; the walk hard-caps at twice this value
    pub max_walk_length: usize,
    /// Fresh-anchor attempts before giving up on one region
    pub max_attempts: usize,
    /// Grid ring (in cells) around the anchor that the walk may roam
    pub anchor_ring: i32,
}

/// Attempt to extract one closed region, retrying up to the attempt budget
///
/// Returns the trimmed boundary polygon, or `None` when every attempt was
/// abandoned: the expected outcome on empty or edgeless graphs, which
/// callers must tolerate.
pub fn extract_region<R: Rng>(
    graph: &Graph,
    node_grid: &PartitionGrid<NodeId>,
    options: &WalkOptions,
    rng: &mut R,
) -> Option<Vec<Vec2>> {
    for attempt in 0..options.max_attempts {
        if let Some(points) = walk_once(graph, node_grid, options, rng) {
            trace!("region closed on attempt {}: {} sides", attempt + 1, points.len());
            return Some(points);
        }
    }
    trace!("region abandoned after {} attempts", options.max_attempts);
    None
}

/// One walk from a fresh random anchor: `Some(points)` on closure, `None`
/// when abandoned
fn walk_once<R: Rng>(
    graph: &Graph,
    node_grid: &PartitionGrid<NodeId>,
    options: &WalkOptions,
    rng: &mut R,
) -> Option<Vec<Vec2>> {
    let anchor = graph.random_node(rng)?;
    let mut path: Vec<NodeId> = vec![anchor];
    let mut points: Vec<Vec2> = vec![graph.position(anchor)?];
    let hard_cap = options.max_walk_length * 2;

    loop {
        let current = *path.last()?;
        // The first step may go anywhere; later steps stay near the anchor
        // and may only revisit the anchor itself
        let next = if path.len() > 1 {
            graph.random_neighbor_near(
                rng,
                current,
                anchor,
                &path[1..],
                node_grid,
                options.anchor_ring,
            )
        } else {
            graph.random_neighbor(rng, current, &[])
        };
        let Some(next) = next else {
            return None;
        };

        if let Some(first) = path.iter().position(|&id| id == next) {
            if path.len() <= options.min_region_sides {
                // Too short to be a valid region
                return None;
            }
            if first >= path.len() - options.min_region_sides {
                // Would close onto a near-self-touch
                return None;
            }
            return Some(points.split_off(first));
        }

        path.push(next);
        points.push(graph.position(next)?);
        if path.len() > hard_cap {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Bounds, PartitionGrid};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn options(min_sides: usize, attempts: usize) -> WalkOptions {
        WalkOptions {
            min_region_sides: min_sides,
            max_walk_length: 50,
            max_attempts: attempts,
            anchor_ring: 20,
        }
    }

    /// Graph + grid over (0,100)² from explicit positions and edges
    fn world(positions: &[Vec2], edges: &[(NodeId, NodeId)]) -> (Graph, PartitionGrid<NodeId>) {
        let mut graph = Graph::with_capacity(positions.len());
        let mut grid = PartitionGrid::new(Bounds::new(0.0, 100.0, 0.0, 100.0), 10.0).unwrap();
        for &position in positions {
            let id = graph.add_node(position).unwrap();
            grid.insert(id, position);
        }
        for &(a, b) in edges {
            graph.add_edge(a, b);
        }
        (graph, grid)
    }

    #[test]
    fn test_square_closes_four_point_region() {
        let corners = [
            Vec2::new(20.0, 20.0),
            Vec2::new(80.0, 20.0),
            Vec2::new(80.0, 80.0),
            Vec2::new(20.0, 80.0),
        ];
        let (graph, grid) = world(&corners, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let points = extract_region(&graph, &grid, &options(3, 64), &mut rng).unwrap();
        assert_eq!(points.len(), 4);

        // The boundary visits the corners in cycle order, up to rotation
        // and direction
        let start = corners
            .iter()
            .position(|&corner| corner == points[0])
            .unwrap();
        let forward: Vec<Vec2> = (0..4).map(|i| corners[(start + i) % 4]).collect();
        let backward: Vec<Vec2> = (0..4).map(|i| corners[(start + 4 - i) % 4]).collect();
        assert!(points == forward || points == backward);
    }

    #[test]
    fn test_square_closure_edge_is_live_adjacency() {
        let corners = [
            Vec2::new(20.0, 20.0),
            Vec2::new(80.0, 20.0),
            Vec2::new(80.0, 80.0),
            Vec2::new(20.0, 80.0),
        ];
        let (graph, grid) = world(&corners, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let points = extract_region(&graph, &grid, &options(3, 64), &mut rng).unwrap();
        let first = graph.node_id_at(points[0]).unwrap();
        let last = graph.node_id_at(*points.last().unwrap()).unwrap();
        assert!(graph.is_adjacent(first, last));
    }

    #[test]
    fn test_triangle_is_below_minimum_sides() {
        let corners = [
            Vec2::new(20.0, 20.0),
            Vec2::new(80.0, 20.0),
            Vec2::new(50.0, 80.0),
        ];
        let (graph, grid) = world(&corners, &[(0, 1), (1, 2), (2, 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        // A 3-cycle can only close at path length 3, which the minimum-sides
        // rule abandons
        assert_eq!(extract_region(&graph, &grid, &options(3, 32), &mut rng), None);
    }

    #[test]
    fn test_empty_graph_terminates_with_no_region() {
        let (graph, grid) = world(&[], &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(extract_region(&graph, &grid, &options(3, 16), &mut rng), None);
    }

    #[test]
    fn test_edgeless_graph_terminates_with_no_region() {
        let positions = [Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0)];
        let (graph, grid) = world(&positions, &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(extract_region(&graph, &grid, &options(3, 16), &mut rng), None);
    }

    #[test]
    fn test_path_graph_dead_ends() {
        // A chain has no cycle to close
        let positions = [
            Vec2::new(10.0, 10.0),
            Vec2::new(30.0, 10.0),
            Vec2::new(50.0, 10.0),
        ];
        let (graph, grid) = world(&positions, &[(0, 1), (1, 2)]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(extract_region(&graph, &grid, &options(3, 32), &mut rng), None);
    }

    #[test]
    fn test_pentagon_trims_to_full_cycle() {
        let corners = [
            Vec2::new(50.0, 10.0),
            Vec2::new(90.0, 40.0),
            Vec2::new(75.0, 85.0),
            Vec2::new(25.0, 85.0),
            Vec2::new(10.0, 40.0),
        ];
        let (graph, grid) = world(&corners, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let points = extract_region(&graph, &grid, &options(3, 64), &mut rng).unwrap();
        assert_eq!(points.len(), 5);
        for point in &points {
            assert!(corners.contains(point));
        }
    }

    #[test]
    fn test_region_side_count() {
        let region = Region {
            points: vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y],
            order: 0,
        };
        assert_eq!(region.side_count(), 4);
    }
}
