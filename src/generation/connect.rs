//! Crossing-free edge construction
//!
//! Connects scattered nodes into a planar graph over bounded passes. Each
//! pass visits every node still below the degree target in randomized
//! order and tries nearby candidates, rejecting any edge that is too long
//! or properly crosses a committed segment.
//!
//! The crossing check is the performance-critical path: candidates are
//! compared only against segments returned by a line-grid ring query, not
//! the full committed set, which keeps per-edge work near-constant for
//! typical densities.

use std::collections::HashSet;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::Segment;
use crate::graph::{Graph, NodeId};
use crate::grid::PartitionGrid;

/// Inputs to the connection passes
#[derive(Debug, Clone, Copy)]
pub struct ConnectOptions {
    /// Maximum length of a committed edge
    pub max_edge_length: f32,
    /// Degree target per node
    pub min_connections: usize,
    /// Maximum number of passes over under-connected nodes
    pub max_passes: usize,
}

/// Outcome quantities of a build
///
/// Under-connection is an expected, recoverable outcome: passes stop at
/// the budget even when some nodes stay below target, and callers read the
/// shortfall here instead of receiving an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    /// Passes actually run
    pub passes_run: usize,
    /// Nodes whose degree reached the target
    pub nodes_at_target: usize,
    /// Live nodes at the end of the build
    pub node_count: usize,
}

impl BuildStats {
    /// True when at least 95% of nodes reached the degree target
    pub fn target_met(&self) -> bool {
        self.nodes_at_target * 20 >= self.node_count * 19
    }
}

/// Run bounded connection passes until the coverage target or pass budget
/// is reached
///
/// Committed segments are appended to `segments` and indexed in
/// `line_grid` under both endpoint buckets; edges are recorded in the
/// graph. `node_grid` must already hold every live node id.
pub fn connect_graph<R: Rng>(
    graph: &mut Graph,
    node_grid: &PartitionGrid<NodeId>,
    segments: &mut Vec<Segment>,
    line_grid: &mut PartitionGrid<usize>,
    options: ConnectOptions,
    rng: &mut R,
) -> BuildStats {
    // Candidate nodes live within max_edge_length of the anchor. Committed
    // segments are keyed by their endpoints and are at most max_edge_length
    // long, while a crossing must lie on the candidate itself: every
    // crossing segment therefore has both endpoints within twice that
    // distance, and the wider ring keeps the grid-restricted check exact.
    let node_ring = ring_cells(options.max_edge_length, node_grid);
    let line_ring = ring_cells(2.0 * options.max_edge_length, line_grid);

    let mut passes_run = 0;
    for pass in 0..options.max_passes {
        let mut worklist: Vec<NodeId> = graph
            .node_ids()
            .filter(|&id| graph.degree(id) < options.min_connections)
            .collect();
        if worklist.is_empty() {
            break;
        }
        worklist.shuffle(rng);

        for id in worklist {
            connect_node(
                graph, node_grid, segments, line_grid, id, node_ring, line_ring, &options, rng,
            );
        }

        passes_run = pass + 1;
        let stats = stats_snapshot(graph, &options, passes_run);
        debug!(
            "connect pass {}: {}/{} nodes at degree target, {} segments",
            passes_run,
            stats.nodes_at_target,
            stats.node_count,
            segments.len()
        );
        if stats.target_met() {
            return stats;
        }
    }

    stats_snapshot(graph, &options, passes_run)
}

fn stats_snapshot(graph: &Graph, options: &ConnectOptions, passes_run: usize) -> BuildStats {
    BuildStats {
        passes_run,
        nodes_at_target: graph
            .node_ids()
            .filter(|&id| graph.degree(id) >= options.min_connections)
            .count(),
        node_count: graph.len(),
    }
}

fn ring_cells<T: Copy>(reach: f32, grid: &PartitionGrid<T>) -> i32 {
    let min_cell = grid.cell_width().min(grid.cell_height());
    (reach / min_cell).ceil() as i32
}

/// Try candidates around one node until its degree target is met
#[allow(clippy::too_many_arguments)]
fn connect_node<R: Rng>(
    graph: &mut Graph,
    node_grid: &PartitionGrid<NodeId>,
    segments: &mut Vec<Segment>,
    line_grid: &mut PartitionGrid<usize>,
    id: NodeId,
    node_ring: i32,
    line_ring: i32,
    options: &ConnectOptions,
    rng: &mut R,
) {
    let Some(position) = graph.position(id) else {
        return;
    };

    let mut candidates = node_grid.query(position, node_ring);
    candidates.shuffle(rng);

    for candidate in candidates {
        if graph.degree(id) >= options.min_connections {
            break;
        }
        if candidate == id || graph.is_adjacent(id, candidate) {
            continue;
        }
        let Some(candidate_position) = graph.position(candidate) else {
            continue;
        };

        let edge = Segment::new(position, candidate_position);
        if edge.length() > options.max_edge_length {
            continue;
        }
        if crosses_committed(&edge, segments, line_grid, line_ring) {
            continue;
        }

        let index = segments.len();
        segments.push(edge);
        line_grid.insert_segment(index, &edge);
        graph.add_edge(id, candidate);
    }
}

/// True when the candidate properly crosses any nearby committed segment
fn crosses_committed(
    candidate: &Segment,
    segments: &[Segment],
    line_grid: &PartitionGrid<usize>,
    line_ring: i32,
) -> bool {
    // Two-cell segments appear once per endpoint bucket
    let mut seen = HashSet::new();
    for index in line_grid.query(candidate.start, line_ring) {
        if !seen.insert(index) {
            continue;
        }
        if candidate.properly_intersects(&segments[index]) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Bounds;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn build_world(
        positions: &[Vec2],
        bounds: Bounds,
        cell_size: f32,
        options: ConnectOptions,
        seed: u64,
    ) -> (Graph, Vec<Segment>, BuildStats) {
        let mut graph = Graph::with_capacity(positions.len());
        let mut node_grid = PartitionGrid::new(bounds, cell_size).unwrap();
        let mut line_grid = PartitionGrid::new(bounds, cell_size).unwrap();
        for &position in positions {
            let id = graph.add_node(position).unwrap();
            node_grid.insert(id, position);
        }

        let mut segments = Vec::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let stats = connect_graph(
            &mut graph,
            &node_grid,
            &mut segments,
            &mut line_grid,
            options,
            &mut rng,
        );
        (graph, segments, stats)
    }

    #[test]
    fn test_triangle_fully_connects() {
        let positions = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 8.0),
        ];
        let options = ConnectOptions {
            max_edge_length: 15.0,
            min_connections: 2,
            max_passes: 3,
        };
        let (graph, segments, stats) = build_world(
            &positions,
            Bounds::new(0.0, 20.0, 0.0, 20.0),
            10.0,
            options,
            42,
        );

        assert!(graph.is_adjacent(0, 1));
        assert!(graph.is_adjacent(1, 2));
        assert!(graph.is_adjacent(0, 2));
        assert_eq!(segments.len(), 3);
        assert_eq!(stats.nodes_at_target, 3);
        assert!(stats.target_met());
    }

    #[test]
    fn test_length_budget_respected() {
        let positions = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(90.0, 90.0),
        ];
        let options = ConnectOptions {
            max_edge_length: 15.0,
            min_connections: 2,
            max_passes: 2,
        };
        let (graph, segments, stats) = build_world(
            &positions,
            Bounds::new(0.0, 100.0, 0.0, 100.0),
            10.0,
            options,
            42,
        );

        assert!(graph.is_adjacent(0, 1));
        assert!(!graph.is_adjacent(0, 2));
        assert!(!graph.is_adjacent(1, 2));
        for segment in &segments {
            assert!(segment.length() <= options.max_edge_length);
        }
        // The far node stays under target; that is a reported quantity
        assert_eq!(stats.nodes_at_target, 0);
        assert_eq!(stats.node_count, 3);
        assert!(!stats.target_met());
    }

    #[test]
    fn test_no_crossings_in_built_graph() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let positions: Vec<Vec2> =
            crate::generation::scatter_points(50, 300.0, 300.0, &mut rng);
        let options = ConnectOptions {
            max_edge_length: 90.0,
            min_connections: 3,
            max_passes: 3,
        };
        let (_, segments, _) = build_world(
            &positions,
            Bounds::new(0.0, 300.0, 0.0, 300.0),
            40.0,
            options,
            42,
        );

        assert!(!segments.is_empty());
        for (i, a) in segments.iter().enumerate() {
            for b in segments.iter().skip(i + 1) {
                assert!(
                    !a.properly_intersects(b),
                    "committed segments {:?} and {:?} cross",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_pass_budget_is_honored() {
        let positions = [Vec2::new(5.0, 5.0)];
        let options = ConnectOptions {
            max_edge_length: 10.0,
            min_connections: 3,
            max_passes: 4,
        };
        // A single isolated node can never connect; all passes run
        let (_, _, stats) = build_world(
            &positions,
            Bounds::new(0.0, 20.0, 0.0, 20.0),
            10.0,
            options,
            42,
        );
        assert_eq!(stats.passes_run, 4);
        assert_eq!(stats.nodes_at_target, 0);
    }

    #[test]
    fn test_connected_graph_skips_remaining_passes() {
        let positions = [Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0)];
        let options = ConnectOptions {
            max_edge_length: 10.0,
            min_connections: 1,
            max_passes: 5,
        };
        let (graph, _, stats) = build_world(
            &positions,
            Bounds::new(0.0, 20.0, 0.0, 20.0),
            10.0,
            options,
            42,
        );
        assert!(graph.is_adjacent(0, 1));
        assert_eq!(stats.passes_run, 1);
        assert!(stats.target_met());
    }
}
