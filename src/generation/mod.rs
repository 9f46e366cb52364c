//! Graph build pipeline
//!
//! Scatters random nodes over the domain, indexes them in a partition
//! grid, then runs crossing-free connection passes until the degree
//! target or the pass budget is reached.

mod connect;
mod scatter;

pub use connect::{connect_graph, BuildStats, ConnectOptions};
pub use scatter::scatter_points;

use rand::Rng;

use crate::config::MapConfig;
use crate::error::Result;
use crate::geometry::Segment;
use crate::graph::{Graph, NodeId};
use crate::grid::{Bounds, PartitionGrid};

/// Graph, grids, and committed segments produced by the build pipeline
///
/// Intermediate output consumed by the world façade; the line grid indexes
/// into `segments` by position in the vector.
pub struct BuiltGraph {
    /// Node store with the committed adjacency
    pub graph: Graph,
    /// Node ids bucketed by position
    pub node_grid: PartitionGrid<NodeId>,
    /// Committed edge segments, in commit order
    pub segments: Vec<Segment>,
    /// Segment indices bucketed under both endpoint cells
    pub line_grid: PartitionGrid<usize>,
    /// Build outcome quantities
    pub stats: BuildStats,
}

/// Scatter and connect a full graph from configuration
///
/// # Errors
///
/// Returns [`crate::MapError::DegenerateGrid`] when the domain/cell-size
/// combination yields no grid cells. Node placement itself cannot overflow
/// the store: capacity equals the configured node count.
pub fn build_graph<R: Rng>(config: &MapConfig, rng: &mut R) -> Result<BuiltGraph> {
    let bounds = Bounds::of_size(config.width(), config.height());
    let mut node_grid = PartitionGrid::new(bounds, config.cell_size)?;
    let mut line_grid = PartitionGrid::new(bounds, config.cell_size)?;
    let mut graph = Graph::with_capacity(config.node_count());

    for position in scatter_points(config.node_count(), config.width(), config.height(), rng) {
        let id = graph.add_node(position)?;
        node_grid.insert(id, position);
    }

    let mut segments = Vec::new();
    let options = ConnectOptions {
        max_edge_length: config.max_edge_length,
        min_connections: config.min_connections,
        max_passes: config.max_build_passes,
    };
    let stats = connect_graph(
        &mut graph,
        &node_grid,
        &mut segments,
        &mut line_grid,
        options,
        rng,
    );

    Ok(BuiltGraph {
        graph,
        node_grid,
        segments,
        line_grid,
        stats,
    })
}
