//! Capacity-bounded planar graph store
//!
//! Nodes are small integer ids into a fixed-capacity slot array; freed ids
//! go to a pool and are reused by later insertions. The undirected
//! adjacency relation is a dense boolean matrix sized to capacity, trading
//! memory for O(1) edge tests: map graphs hold hundreds of nodes at a few
//! connections each, so capacity² booleans stay cheap.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::error::{MapError, Result};
use crate::grid::PartitionGrid;

/// Index of a node in the store
pub type NodeId = usize;

/// Node slots plus the symmetric adjacency relation
///
/// The store exclusively owns node positions and adjacency; spatial grids
/// hold only id back-references into it.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Slot per id; `None` marks a freed slot
    positions: Vec<Option<Vec2>>,
    /// Row-major capacity × capacity matrix
    adjacency: Vec<bool>,
    /// Freed ids awaiting reuse
    free: Vec<NodeId>,
    /// Next never-assigned id
    next: NodeId,
    live: usize,
}

impl Graph {
    /// Create an empty store holding at most `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: vec![None; capacity],
            adjacency: vec![false; capacity * capacity],
            free: Vec::new(),
            next: 0,
            live: 0,
        }
    }

    /// Maximum number of simultaneously live nodes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when no node is live
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[inline]
    fn entry(&self, a: NodeId, b: NodeId) -> usize {
        a * self.capacity() + b
    }

    /// True when `id` names a live node
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.get(id).is_some_and(|slot| slot.is_some())
    }

    /// Position of a live node
    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.positions.get(id).copied().flatten()
    }

    /// Add a node, reusing a freed id when one is available
    ///
    /// # Errors
    ///
    /// Returns [`MapError::CapacityExceeded`] when the store is full and no
    /// freed ids remain.
    pub fn add_node(&mut self, position: Vec2) -> Result<NodeId> {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                if self.next == self.capacity() {
                    return Err(MapError::CapacityExceeded(self.capacity()));
                }
                let id = self.next;
                self.next += 1;
                id
            }
        };
        self.positions[id] = Some(position);
        self.live += 1;
        Ok(id)
    }

    /// Add a node and connect it to each listed neighbor
    pub fn add_node_with_edges(&mut self, position: Vec2, neighbors: &[NodeId]) -> Result<NodeId> {
        let id = self.add_node(position)?;
        for &neighbor in neighbors {
            self.add_edge(id, neighbor);
        }
        Ok(id)
    }

    /// Remove a node, clearing its slot and every incident edge
    ///
    /// The id returns to the free pool and is not exposed by any
    /// enumeration until reassigned. Removing a dead or out-of-range id is
    /// a no-op.
    pub fn remove_node(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.positions[id] = None;
        for other in 0..self.capacity() {
            let forward = self.entry(id, other);
            self.adjacency[forward] = false;
            let backward = self.entry(other, id);
            self.adjacency[backward] = false;
        }
        self.free.push(id);
        self.live -= 1;
    }

    /// Set the symmetric adjacency entry for (a, b)
    ///
    /// Idempotent; self-loops and edges touching dead ids are ignored.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        if a == b || !self.contains(a) || !self.contains(b) {
            return;
        }
        let forward = self.entry(a, b);
        self.adjacency[forward] = true;
        let backward = self.entry(b, a);
        self.adjacency[backward] = true;
    }

    /// Clear the symmetric adjacency entry for (a, b); idempotent
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) {
        if a >= self.capacity() || b >= self.capacity() {
            return;
        }
        let forward = self.entry(a, b);
        self.adjacency[forward] = false;
        let backward = self.entry(b, a);
        self.adjacency[backward] = false;
    }

    /// Edge existence test
    #[inline]
    pub fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        a < self.capacity() && b < self.capacity() && self.adjacency[self.entry(a, b)]
    }

    /// Number of neighbors of `id`
    pub fn degree(&self, id: NodeId) -> usize {
        if id >= self.capacity() {
            return 0;
        }
        let row = &self.adjacency[self.entry(id, 0)..self.entry(id, 0) + self.capacity()];
        row.iter().filter(|&&set| set).count()
    }

    /// Ids adjacent to `id`, in ascending order
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        if id >= self.capacity() {
            return Vec::new();
        }
        let row = &self.adjacency[self.entry(id, 0)..self.entry(id, 0) + self.capacity()];
        row.iter()
            .enumerate()
            .filter_map(|(other, &set)| set.then_some(other))
            .collect()
    }

    /// Iterator over all live node ids
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.positions
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.map(|_| id))
    }

    /// Every undirected edge once, as (a, b) pairs with a < b
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges = Vec::new();
        for a in 0..self.capacity() {
            for b in (a + 1)..self.capacity() {
                if self.adjacency[self.entry(a, b)] {
                    edges.push((a, b));
                }
            }
        }
        edges
    }

    /// Reverse lookup of a node id by exact position
    pub fn node_id_at(&self, position: Vec2) -> Option<NodeId> {
        self.positions
            .iter()
            .position(|&slot| slot == Some(position))
    }

    /// Uniformly sample one live node
    pub fn random_node<R: Rng>(&self, rng: &mut R) -> Option<NodeId> {
        let ids: Vec<NodeId> = self.node_ids().collect();
        ids.choose(rng).copied()
    }

    /// Uniformly sample a neighbor of `id` outside `exclude`
    ///
    /// Returns `None` when no eligible neighbor exists.
    pub fn random_neighbor<R: Rng>(
        &self,
        rng: &mut R,
        id: NodeId,
        exclude: &[NodeId],
    ) -> Option<NodeId> {
        let eligible: Vec<NodeId> = self
            .neighbors(id)
            .into_iter()
            .filter(|candidate| !exclude.contains(candidate))
            .collect();
        eligible.choose(rng).copied()
    }

    /// Like [`Graph::random_neighbor`], further restricted to ids near an
    /// anchor node
    ///
    /// Eligible neighbors must also appear in a grid query of `ring` cells
    /// around the anchor's position; this keeps continent walks spatially
    /// local. Returns `None` when the anchor is dead or no neighbor
    /// qualifies.
    pub fn random_neighbor_near<R: Rng>(
        &self,
        rng: &mut R,
        id: NodeId,
        anchor: NodeId,
        exclude: &[NodeId],
        grid: &PartitionGrid<NodeId>,
        ring: i32,
    ) -> Option<NodeId> {
        let anchor_position = self.position(anchor)?;
        let nearby: HashSet<NodeId> = grid.query(anchor_position, ring).into_iter().collect();
        let eligible: Vec<NodeId> = self
            .neighbors(id)
            .into_iter()
            .filter(|candidate| nearby.contains(candidate) && !exclude.contains(candidate))
            .collect();
        eligible.choose(rng).copied()
    }
}
