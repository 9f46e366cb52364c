//! Crossing-free planar graphs and continent extraction
//!
//! A standalone library for procedurally generating 2D continent maps:
//! random nodes are connected into a planar, non-self-intersecting graph
//! under length and degree budgets, then closed polygonal regions
//! ("continents") are carved out of the graph by randomized boundary
//! walks. Rendering and interaction stay outside this crate: a consumer
//! reads nodes, edges, and region polygons and draws them however it
//! likes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use planar_continents::*;
//!
//! // Generate a map
//! let config = MapConfigBuilder::new()
//!     .seed(42)
//!     .map_size(MapSize::Medium)
//!     .unwrap()
//!     .continent_count(8)
//!     .build()
//!     .unwrap();
//!
//! let world = WorldMap::generate(config).unwrap();
//!
//! // Hand nodes, edges, and continents to a renderer
//! for (a, b) in world.edges() {
//!     let _ = (world.position(a), world.position(b));
//! }
//! for region in world.regions() {
//!     println!("continent {} with {} sides", region.order, region.side_count());
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): O(log n) position-to-node lookups using a
//!   KD-tree
//! - `serde`: serialization support for configuration and regions

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod grid;
pub mod graph;
pub mod generation;
pub mod regions;
pub mod world;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{MapError, Result};
pub use config::{MapConfig, MapConfigBuilder, MapSize};
pub use geometry::{orientation, Segment};
pub use grid::{Bounds, PartitionGrid};
pub use graph::{Graph, NodeId};
pub use generation::{BuildStats, ConnectOptions};
pub use regions::Region;
pub use world::WorldMap;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec2 for convenience
pub use glam::Vec2;
