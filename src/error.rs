//! Error types for map generation

use std::fmt;

/// Errors that can occur during map generation or store operations
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// Node store is full and no freed ids remain
    CapacityExceeded(usize),
    /// Grid domain and cell size yield zero cells in at least one axis
    DegenerateGrid {
        /// Computed column count
        cols: usize,
        /// Computed row count
        rows: usize,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            MapError::CapacityExceeded(capacity) => {
                write!(f, "node store full: capacity {}", capacity)
            }
            MapError::DegenerateGrid { cols, rows } => {
                write!(f, "degenerate grid: {} x {} cells", cols, rows)
            }
        }
    }
}

impl std::error::Error for MapError {}

/// Result type alias for map operations
pub type Result<T> = std::result::Result<T, MapError>;
