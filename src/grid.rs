//! Uniform spatial partition grid
//!
//! A bucket grid over a bounded rectangle, used to restrict geometric
//! queries to nearby items. The builder keeps one grid of node ids and one
//! of committed segment indices; per-candidate work then touches only a
//! handful of buckets instead of the whole item set.

use glam::Vec2;

use crate::error::{MapError, Result};
use crate::geometry::Segment;

/// Axis-aligned rectangle bounding a partition grid's domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum x coordinate
    pub x_min: f32,
    /// Maximum x coordinate
    pub x_max: f32,
    /// Minimum y coordinate
    pub y_min: f32,
    /// Maximum y coordinate
    pub y_max: f32,
}

impl Bounds {
    /// Create bounds from explicit extents
    pub fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Bounds anchored at the origin with the given dimensions
    pub fn of_size(width: f32, height: f32) -> Self {
        Self::new(0.0, width, 0.0, height)
    }

    /// Domain width
    #[inline]
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Domain height
    #[inline]
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }
}

/// Uniform bucket grid over a bounded rectangle
///
/// Each bucket holds the items whose anchor point falls in its cell. The
/// grid owns no geometry itself, only bucket membership; items are
/// back-references (node ids, segment indices) into data owned elsewhere.
///
/// Cell counts are `floor(extent / cell_size)` per axis; actual cell
/// dimensions then divide the domain evenly by those counts, so cells may
/// be slightly larger than requested to tile exactly.
#[derive(Debug, Clone)]
pub struct PartitionGrid<T> {
    bounds: Bounds,
    cols: usize,
    rows: usize,
    cell_width: f32,
    cell_height: f32,
    buckets: Vec<Vec<T>>,
}

impl<T: Copy> PartitionGrid<T> {
    /// Create a grid over `bounds` with the requested cell size
    ///
    /// # Errors
    ///
    /// Returns [`MapError::DegenerateGrid`] when the domain/cell-size
    /// combination yields zero cells in either axis (including non-positive
    /// cell sizes or empty domains).
    pub fn new(bounds: Bounds, cell_size: f32) -> Result<Self> {
        let (cols, rows) = if cell_size > 0.0 {
            (
                (bounds.width() / cell_size).floor().max(0.0) as usize,
                (bounds.height() / cell_size).floor().max(0.0) as usize,
            )
        } else {
            (0, 0)
        };

        if cols == 0 || rows == 0 {
            return Err(MapError::DegenerateGrid { cols, rows });
        }

        Ok(Self {
            bounds,
            cols,
            rows,
            cell_width: bounds.width() / cols as f32,
            cell_height: bounds.height() / rows as f32,
            buckets: vec![Vec::new(); cols * rows],
        })
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Actual cell width after tiling the domain evenly
    #[inline]
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Actual cell height after tiling the domain evenly
    #[inline]
    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Domain bounds
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Bucket coordinates for an anchor point, clamped to the grid
    ///
    /// Clamping keeps anchors on the max edge (and any slightly
    /// out-of-domain anchors) in the nearest boundary cell.
    fn cell_of(&self, anchor: Vec2) -> (usize, usize) {
        let col = ((anchor.x - self.bounds.x_min) / self.cell_width).floor() as isize;
        let row = ((anchor.y - self.bounds.y_min) / self.cell_height).floor() as isize;
        (
            row.clamp(0, self.rows as isize - 1) as usize,
            col.clamp(0, self.cols as isize - 1) as usize,
        )
    }

    #[inline]
    fn bucket_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Insert an item into the bucket of its anchor point
    pub fn insert(&mut self, item: T, anchor: Vec2) {
        let (row, col) = self.cell_of(anchor);
        let index = self.bucket_index(row, col);
        self.buckets[index].push(item);
    }

    /// Insert a segment-keyed item under both endpoint buckets
    ///
    /// The item lands in the start bucket and, when the end point falls in
    /// a different cell, in the end bucket too (a duplicated reference).
    /// Cells along the segment's path are never touched; queries that must
    /// see every segment crossing a neighborhood widen their ring instead.
    pub fn insert_segment(&mut self, item: T, segment: &Segment) {
        let start = self.cell_of(segment.start);
        let end = self.cell_of(segment.end);
        let index = self.bucket_index(start.0, start.1);
        self.buckets[index].push(item);
        if end != start {
            let index = self.bucket_index(end.0, end.1);
            self.buckets[index].push(item);
        }
    }

    /// Collect every item within `ring` cells of the anchor's bucket
    ///
    /// Returns the union of all buckets whose row and column both lie
    /// within `ring` of the anchor's cell, clipped to the grid. The result
    /// is not deduplicated: a segment inserted under two buckets may appear
    /// twice, and callers that need uniqueness must deduplicate (e.g. via a
    /// set). A negative ring returns an empty result.
    pub fn query(&self, anchor: Vec2, ring: i32) -> Vec<T> {
        if ring < 0 {
            return Vec::new();
        }

        let (row, col) = self.cell_of(anchor);
        let ring = ring as usize;
        let row_lo = row.saturating_sub(ring);
        let row_hi = (row + ring).min(self.rows - 1);
        let col_lo = col.saturating_sub(ring);
        let col_hi = (col + ring).min(self.cols - 1);

        let mut items = Vec::new();
        for r in row_lo..=row_hi {
            for c in col_lo..=col_hi {
                items.extend_from_slice(&self.buckets[self.bucket_index(r, c)]);
            }
        }
        items
    }

    /// Clear every bucket without reallocating grid dimensions
    pub fn reset(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Total number of stored references across all buckets
    ///
    /// Segments spanning two cells count twice.
    pub fn item_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}
