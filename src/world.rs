//! WorldMap main structure

use glam::Vec2;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::MapConfig;
use crate::error::Result;
use crate::generation::{build_graph, BuildStats};
use crate::geometry::Segment;
use crate::graph::{Graph, NodeId};
use crate::grid::PartitionGrid;
use crate::regions::{extract_region, Region, WalkOptions};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A complete generated continent map
///
/// Owns the planar graph, both partition grids, the committed segment
/// arena, and the extracted region list. All randomness flows from one
/// seeded generator owned here, so a configuration reproduces the same
/// map: including any continents extracted after generation, as long as
/// the extraction calls happen in the same sequence.
///
/// The map is a single-writer structure with no internal locking; share it
/// across threads only behind external synchronization.
///
/// # Examples
///
/// ```
/// use planar_continents::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Small)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let world = WorldMap::generate(config).unwrap();
/// println!(
///     "{} nodes, {} edges, {} continents",
///     world.node_count(),
///     world.edges().len(),
///     world.regions().len()
/// );
/// ```
#[derive(Clone)]
pub struct WorldMap {
    /// Configuration used to generate this map
    config: MapConfig,

    /// Node store and adjacency
    graph: Graph,

    /// Node ids bucketed by position
    node_grid: PartitionGrid<NodeId>,

    /// Committed edge segments, in commit order
    segments: Vec<Segment>,

    /// Segment indices bucketed under both endpoint cells
    line_grid: PartitionGrid<usize>,

    /// Extracted continents, ordered by generation tag
    regions: Vec<Region>,

    /// Build outcome quantities
    stats: BuildStats,

    /// Shared random source for extraction after generation
    rng: ChaCha8Rng,

    /// Nearest-node index over the generated positions
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl WorldMap {
    /// Generate a map: scatter nodes, connect them crossing-free, then
    /// extract the configured number of continents
    ///
    /// # Errors
    ///
    /// Returns an error only for degenerate grid configurations; builder
    /// under-connection and continent shortfalls are reported as
    /// quantities ([`WorldMap::build_stats`], the region list length), not
    /// errors.
    ///
    /// # Example
    ///
    /// ```
    /// use planar_continents::*;
    ///
    /// let config = MapConfigBuilder::new()
    ///     .seed(12345)
    ///     .map_size(MapSize::Small)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    /// let world = WorldMap::generate(config).unwrap();
    /// assert!(world.node_count() > 0);
    /// ```
    pub fn generate(config: MapConfig) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let built = build_graph(&config, &mut rng)?;
        debug!(
            "graph built: {} nodes, {} edges, {} passes",
            built.graph.len(),
            built.segments.len(),
            built.stats.passes_run
        );

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let positions: Vec<Vec2> = built
                .graph
                .node_ids()
                .filter_map(|id| built.graph.position(id))
                .collect();
            SpatialIndex::new(&positions)
        };

        let mut world = Self {
            config,
            graph: built.graph,
            node_grid: built.node_grid,
            segments: built.segments,
            line_grid: built.line_grid,
            regions: Vec::new(),
            stats: built.stats,
            rng,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        };
        world.extract_continents(config.continent_count);
        Ok(world)
    }

    /// Get the configuration used to generate this map
    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Number of live nodes
    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    /// Iterator over all live node ids
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_ids()
    }

    /// Position of a node, or `None` for dead ids
    #[inline]
    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.graph.position(id)
    }

    /// Ids adjacent to `id`, in ascending order
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        self.graph.neighbors(id)
    }

    /// Every undirected edge once, as (a, b) pairs with a < b
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.graph.edges()
    }

    /// Committed edge segments, in commit order
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Borrow the underlying graph store
    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Indices into [`WorldMap::segments`] within `ring` grid cells of a
    /// position, deduplicated and ascending
    ///
    /// Spatial edge lookup for external consumers (viewport culling,
    /// hover queries). A negative ring yields an empty result.
    pub fn segments_near(&self, position: Vec2, ring: i32) -> Vec<usize> {
        let mut indices = self.line_grid.query(position, ring);
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Extracted continents, ordered by generation tag
    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Build outcome quantities
    #[inline]
    pub fn build_stats(&self) -> BuildStats {
        self.stats
    }

    /// Attempt to extract one more continent
    ///
    /// Runs bounded walk attempts against the generated graph and appends
    /// the result to the region list with the next generation tag.
    /// Returns `None` when every attempt was abandoned (always the case on
    /// an edgeless graph): the map is unchanged then.
    pub fn extract_continent(&mut self) -> Option<&Region> {
        let options = self.walk_options();
        let points = extract_region(&self.graph, &self.node_grid, &options, &mut self.rng)?;
        let order = self.regions.len();
        self.regions.push(Region { points, order });
        self.regions.last()
    }

    /// Attempt to extract `count` more continents, returning how many were
    /// actually produced
    ///
    /// A shortfall is not an error; callers needing guaranteed regions
    /// check the returned count.
    pub fn extract_continents(&mut self, count: usize) -> usize {
        let mut produced = 0;
        for _ in 0..count {
            if self.extract_continent().is_some() {
                produced += 1;
            }
        }
        if produced < count {
            debug!("extracted {}/{} requested continents", produced, count);
        }
        produced
    }

    fn walk_options(&self) -> WalkOptions {
        let min_cell = self
            .node_grid
            .cell_width()
            .min(self.node_grid.cell_height());
        WalkOptions {
            min_region_sides: self.config.min_region_sides,
            max_walk_length: self.config.max_walk_length,
            max_attempts: self.config.max_attempts_per_region,
            // Walks may roam a couple of edge lengths from their anchor
            anchor_ring: (2.0 * self.config.max_edge_length / min_cell).ceil() as i32,
        }
    }

    /// Find the node nearest to a position (requires the `spatial-index`
    /// feature)
    ///
    /// Converts positions from picking or cursor input into node ids via a
    /// KD-tree lookup over the generated node positions.
    ///
    /// # Example
    ///
    /// ```
    /// # use planar_continents::*;
    /// # let config = MapConfigBuilder::new().seed(1).build().unwrap();
    /// # let world = WorldMap::generate(config).unwrap();
    /// let id = world.find_node_at(Vec2::new(500.0, 375.0));
    /// assert!(world.position(id).is_some());
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_node_at(&self, position: Vec2) -> NodeId {
        self.spatial_index.find_nearest(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapConfigBuilder, MapSize};

    fn test_config(seed: u64) -> MapConfig {
        MapConfigBuilder::new()
            .seed(seed)
            .map_size(MapSize::Custom {
                width: 400.0,
                height: 400.0,
                node_count: 60,
            })
            .unwrap()
            .max_edge_length(100.0)
            .unwrap()
            .cell_size(40.0)
            .unwrap()
            .continent_count(4)
            .build()
            .unwrap()
    }

    #[test]
    fn test_generate_world() {
        let config = test_config(42);
        let world = WorldMap::generate(config).unwrap();

        assert_eq!(world.node_count(), 60);
        assert!(!world.edges().is_empty());
        assert_eq!(world.segments().len(), world.edges().len());
        assert!(world.regions().len() <= 4);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let world1 = WorldMap::generate(test_config(42)).unwrap();
        let world2 = WorldMap::generate(test_config(42)).unwrap();

        assert_eq!(world1.edges(), world2.edges());
        assert_eq!(world1.regions(), world2.regions());
    }

    #[test]
    fn test_seeds_produce_different_maps() {
        let world1 = WorldMap::generate(test_config(1)).unwrap();
        let world2 = WorldMap::generate(test_config(2)).unwrap();
        assert_ne!(world1.edges(), world2.edges());
    }

    #[test]
    fn test_no_crossings_among_committed_edges() {
        let world = WorldMap::generate(test_config(42)).unwrap();
        let segments = world.segments();
        for (i, a) in segments.iter().enumerate() {
            for b in segments.iter().skip(i + 1) {
                assert!(!a.properly_intersects(b));
            }
        }
    }

    #[test]
    fn test_adjacency_symmetry_across_world() {
        let world = WorldMap::generate(test_config(42)).unwrap();
        for id in world.node_ids() {
            for neighbor in world.neighbors(id) {
                assert!(world.neighbors(neighbor).contains(&id));
            }
        }
    }

    #[test]
    fn test_segments_near_finds_each_segment_at_its_start() {
        let world = WorldMap::generate(test_config(42)).unwrap();
        for (index, segment) in world.segments().iter().enumerate() {
            assert!(world.segments_near(segment.start, 0).contains(&index));
            assert!(world.segments_near(segment.end, 0).contains(&index));
        }
        assert!(world
            .segments_near(Vec2::new(200.0, 200.0), -1)
            .is_empty());
    }

    #[test]
    fn test_regions_are_tagged_in_order() {
        let mut world = WorldMap::generate(test_config(42)).unwrap();
        world.extract_continents(3);
        for (index, region) in world.regions().iter().enumerate() {
            assert_eq!(region.order, index);
            assert!(region.side_count() >= 3);
        }
    }

    #[test]
    fn test_extraction_on_edgeless_world_yields_nothing() {
        // One node per far-apart cluster: nothing is within edge reach
        let config = MapConfigBuilder::new()
            .seed(42)
            .map_size(MapSize::Custom {
                width: 1000.0,
                height: 1000.0,
                node_count: 3,
            })
            .unwrap()
            .max_edge_length(1.0)
            .unwrap()
            .cell_size(100.0)
            .unwrap()
            .continent_count(2)
            .build()
            .unwrap();

        let mut world = WorldMap::generate(config).unwrap();
        assert!(world.regions().is_empty());
        assert_eq!(world.extract_continents(5), 0);
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_node_at_own_position() {
        let world = WorldMap::generate(test_config(42)).unwrap();
        let id = world.node_ids().next().unwrap();
        let position = world.position(id).unwrap();
        assert_eq!(world.find_node_at(position), id);
    }
}
