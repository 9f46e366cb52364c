//! Map configuration and builder
//!
//! Configuration types for deterministic continent-map generation. The same
//! configuration always produces the identical graph and continent set.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Map size presets
///
/// Each size couples a domain rectangle with a node count so that node
/// density stays comparable across presets.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapSize {
    /// Small map: 600 × 450 units, ~90 nodes
    Small,
    /// Medium map: 1000 × 750 units, ~250 nodes (default)
    Medium,
    /// Large map: 2000 × 1500 units, ~1000 nodes
    Large,
    /// Custom map with explicit domain dimensions and node count
    Custom {
        /// Domain width in world units
        width: f32,
        /// Domain height in world units
        height: f32,
        /// Number of nodes to scatter
        node_count: usize,
    },
}

impl MapSize {
    /// Number of nodes scattered for this map size
    pub fn node_count(self) -> usize {
        match self {
            MapSize::Small => 90,
            MapSize::Medium => 250,
            MapSize::Large => 1_000,
            MapSize::Custom { node_count, .. } => node_count,
        }
    }

    /// Domain width for this map size
    pub fn width(self) -> f32 {
        match self {
            MapSize::Small => 600.0,
            MapSize::Medium => 1000.0,
            MapSize::Large => 2000.0,
            MapSize::Custom { width, .. } => width,
        }
    }

    /// Domain height for this map size
    pub fn height(self) -> f32 {
        match self {
            MapSize::Small => 450.0,
            MapSize::Medium => 750.0,
            MapSize::Large => 1500.0,
            MapSize::Custom { height, .. } => height,
        }
    }

    /// Human-readable name for this map size
    pub fn name(self) -> &'static str {
        match self {
            MapSize::Small => "Small",
            MapSize::Medium => "Medium",
            MapSize::Large => "Large",
            MapSize::Custom { .. } => "Custom",
        }
    }
}

impl Default for MapSize {
    fn default() -> Self {
        MapSize::Medium
    }
}

/// Configuration for deterministic map generation
///
/// Serializable (with the `serde` feature) and compact: only the
/// configuration is persisted, never the generated graph: the map is
/// regenerated from the configuration when loading.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Random seed; the same seed with the same parameters always produces
    /// the identical map
    pub seed: u64,

    /// Map size preset (domain dimensions and node count)
    pub map_size: MapSize,

    /// Maximum length of a committed edge
    pub max_edge_length: f32,

    /// Degree the builder tries to reach for every node
    ///
    /// Passes stop early once 95% of nodes meet this target; the remainder
    /// stay under-connected rather than forcing crossings.
    pub min_connections: usize,

    /// Shortest cycle the extractor accepts as a continent
    ///
    /// Closures at or below this path length, or whose repeated node sits
    /// inside the trailing window of this many steps, are abandoned as
    /// degenerate.
    pub min_region_sides: usize,

    /// Maximum number of connection passes over under-connected nodes
    pub max_build_passes: usize,

    /// Walk length at which a continent attempt is considered lost
    ///
    /// The walk hard-caps at twice this value.
    pub max_walk_length: usize,

    /// Fresh-anchor attempts granted per requested continent
    pub max_attempts_per_region: usize,

    /// Requested partition grid cell size, in world units
    pub cell_size: f32,

    /// Continents extracted eagerly by `WorldMap::generate`
    pub continent_count: usize,
}

impl MapConfig {
    /// Domain width for this configuration
    #[inline]
    pub fn width(&self) -> f32 {
        self.map_size.width()
    }

    /// Domain height for this configuration
    #[inline]
    pub fn height(&self) -> f32 {
        self.map_size.height()
    }

    /// Node count for this configuration
    #[inline]
    pub fn node_count(&self) -> usize {
        self.map_size.node_count()
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfigBuilder::new().build().unwrap()
    }
}

/// Builder for creating a [`MapConfig`] with validation
///
/// # Example
///
/// ```rust
/// use planar_continents::*;
///
/// let config = MapConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Small)
///     .unwrap()
///     .min_connections(4)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.seed, 42);
/// ```
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    seed: Option<u64>,
    map_size: MapSize,
    max_edge_length: f32,
    min_connections: usize,
    min_region_sides: usize,
    max_build_passes: usize,
    max_walk_length: usize,
    max_attempts_per_region: usize,
    cell_size: f32,
    continent_count: usize,
}

impl MapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: random
    /// - map_size: Medium (1000 × 750, ~250 nodes)
    /// - max_edge_length: 200
    /// - min_connections: 3
    /// - min_region_sides: 3
    /// - max_build_passes: 3
    /// - max_walk_length: 50
    /// - max_attempts_per_region: 64
    /// - cell_size: 50
    /// - continent_count: 6
    pub fn new() -> Self {
        Self {
            seed: None,
            map_size: MapSize::default(),
            max_edge_length: 200.0,
            min_connections: 3,
            min_region_sides: 3,
            max_build_passes: 3,
            max_walk_length: 50,
            max_attempts_per_region: 64,
            cell_size: 50.0,
            continent_count: 6,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the map size preset
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a custom size with non-positive
    /// dimensions or zero nodes.
    pub fn map_size(mut self, size: MapSize) -> Result<Self> {
        if let MapSize::Custom {
            width,
            height,
            node_count,
        } = size
        {
            if !(width > 0.0) || !(height > 0.0) {
                return Err(MapError::InvalidConfig(format!(
                    "custom map dimensions must be positive (got {} x {})",
                    width, height
                )));
            }
            if node_count == 0 {
                return Err(MapError::InvalidConfig(
                    "custom map node count must be nonzero".to_string(),
                ));
            }
        }
        self.map_size = size;
        Ok(self)
    }

    /// Set the maximum committed edge length
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the length is not positive.
    pub fn max_edge_length(mut self, length: f32) -> Result<Self> {
        if !(length > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "max edge length must be positive (got {})",
                length
            )));
        }
        self.max_edge_length = length;
        Ok(self)
    }

    /// Set the per-node degree target
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the target is zero.
    pub fn min_connections(mut self, connections: usize) -> Result<Self> {
        if connections == 0 {
            return Err(MapError::InvalidConfig(
                "minimum connections must be at least 1".to_string(),
            ));
        }
        self.min_connections = connections;
        Ok(self)
    }

    /// Set the minimum accepted continent side count
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` below 3: a closed polygon needs at least
    /// three corners.
    pub fn min_region_sides(mut self, sides: usize) -> Result<Self> {
        if sides < 3 {
            return Err(MapError::InvalidConfig(format!(
                "minimum region sides must be at least 3 (got {})",
                sides
            )));
        }
        self.min_region_sides = sides;
        Ok(self)
    }

    /// Set the maximum number of connection passes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if zero.
    pub fn max_build_passes(mut self, passes: usize) -> Result<Self> {
        if passes == 0 {
            return Err(MapError::InvalidConfig(
                "at least one build pass is required".to_string(),
            ));
        }
        self.max_build_passes = passes;
        Ok(self)
    }

    /// Set the walk length budget for continent attempts
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if zero.
    pub fn max_walk_length(mut self, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(MapError::InvalidConfig(
                "max walk length must be nonzero".to_string(),
            ));
        }
        self.max_walk_length = length;
        Ok(self)
    }

    /// Set the fresh-anchor attempts granted per requested continent
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if zero.
    pub fn max_attempts_per_region(mut self, attempts: usize) -> Result<Self> {
        if attempts == 0 {
            return Err(MapError::InvalidConfig(
                "at least one attempt per region is required".to_string(),
            ));
        }
        self.max_attempts_per_region = attempts;
        Ok(self)
    }

    /// Set the requested partition grid cell size
    ///
    /// The grid itself still rejects combinations yielding zero cells at
    /// construction time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if not positive.
    pub fn cell_size(mut self, size: f32) -> Result<Self> {
        if !(size > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "cell size must be positive (got {})",
                size
            )));
        }
        self.cell_size = size;
        Ok(self)
    }

    /// Set how many continents `WorldMap::generate` extracts eagerly
    pub fn continent_count(mut self, count: usize) -> Self {
        self.continent_count = count;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, a random seed is drawn.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the walk budget cannot reach the
    /// minimum region size.
    pub fn build(self) -> Result<MapConfig> {
        if self.max_walk_length < self.min_region_sides {
            return Err(MapError::InvalidConfig(format!(
                "max walk length {} cannot close a region of {} sides",
                self.max_walk_length, self.min_region_sides
            )));
        }

        Ok(MapConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            map_size: self.map_size,
            max_edge_length: self.max_edge_length,
            min_connections: self.min_connections,
            min_region_sides: self.min_region_sides,
            max_build_passes: self.max_build_passes,
            max_walk_length: self.max_walk_length,
            max_attempts_per_region: self.max_attempts_per_region,
            cell_size: self.cell_size,
            continent_count: self.continent_count,
        })
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
