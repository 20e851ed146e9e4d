//! Search-node bookkeeping for the A* loop.
//!
//! All nodes live in a [`NodeArena`]; the open and closed collections hold
//! arena indices, and parent back-pointers are arena indices too, so path
//! reconstruction never fights the borrow checker over node ownership.

use std::collections::HashMap;

use nalgebra::Point2;
use railkit_core::PieceId;

/// Index of a node in the arena.
pub type NodeIdx = usize;

// ---------------------------------------------------------------------------
// SearchNode
// ---------------------------------------------------------------------------

/// One admitted route to a piece.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// The piece this node routes to.
    pub piece: PieceId,
    /// The piece's center, cached at admission time.
    pub center: Point2<f64>,
    /// Previous node on the route; `None` for the start node.
    pub parent: Option<NodeIdx>,
    /// Accumulated path cost from the start.
    pub g: f64,
    /// Straight-line distance from this piece to the goal.
    pub h: f64,
    /// `g + h`, the open-list ordering key.
    pub f: f64,
}

impl SearchNode {
    pub fn new(
        piece: PieceId,
        center: Point2<f64>,
        parent: Option<NodeIdx>,
        g: f64,
        h: f64,
    ) -> Self {
        Self {
            piece,
            center,
            parent,
            g,
            h,
            f: g + h,
        }
    }
}

// ---------------------------------------------------------------------------
// NodeArena
// ---------------------------------------------------------------------------

/// Owns every node created during one query.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn push(&mut self, node: SearchNode) -> NodeIdx {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, idx: NodeIdx) -> &SearchNode {
        &self.nodes[idx]
    }

    /// Walk parent links from `idx` back to the start node and return the
    /// piece sequence in start-to-`idx` order.
    pub fn backtrack(&self, idx: NodeIdx) -> Vec<PieceId> {
        let mut path = Vec::new();
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            path.push(self.nodes[i].piece);
            cursor = self.nodes[i].parent;
        }
        path.reverse();
        path
    }
}

// ---------------------------------------------------------------------------
// OpenList
// ---------------------------------------------------------------------------

/// The frontier: ascending-f pop order with stable ties.
///
/// Sorted on insert; a new node lands after any existing equal-f entries,
/// so equal-f nodes pop in insertion order. At most one entry per piece.
#[derive(Debug, Default)]
pub struct OpenList {
    order: Vec<NodeIdx>,
    by_piece: HashMap<PieceId, NodeIdx>,
}

impl OpenList {
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The node for `piece`, if one is on the frontier.
    pub fn node_for(&self, piece: PieceId) -> Option<NodeIdx> {
        self.by_piece.get(&piece).copied()
    }

    /// Insert a node, keeping ascending-f order.
    ///
    /// The caller must have removed any stale entry for the same piece
    /// first; inserting a duplicate piece is a logic error.
    pub fn insert(&mut self, arena: &NodeArena, idx: NodeIdx) {
        let f = arena.get(idx).f;
        let at = self.order.partition_point(|&i| arena.get(i).f <= f);
        self.order.insert(at, idx);
        let previous = self.by_piece.insert(arena.get(idx).piece, idx);
        debug_assert!(previous.is_none(), "duplicate open entry for a piece");
    }

    /// Pop the lowest-f node.
    pub fn pop(&mut self, arena: &NodeArena) -> Option<NodeIdx> {
        if self.order.is_empty() {
            return None;
        }
        let idx = self.order.remove(0);
        self.by_piece.remove(&arena.get(idx).piece);
        Some(idx)
    }

    /// Drop the entry for `piece` from the frontier.
    pub fn remove(&mut self, piece: PieceId) {
        if let Some(idx) = self.by_piece.remove(&piece) {
            if let Some(pos) = self.order.iter().position(|&i| i == idx) {
                self.order.remove(pos);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ClosedSet
// ---------------------------------------------------------------------------

/// Expanded nodes, keyed by piece.
#[derive(Debug, Default)]
pub struct ClosedSet {
    by_piece: HashMap<PieceId, NodeIdx>,
}

impl ClosedSet {
    pub fn node_for(&self, piece: PieceId) -> Option<NodeIdx> {
        self.by_piece.get(&piece).copied()
    }

    pub fn insert(&mut self, piece: PieceId, idx: NodeIdx) {
        self.by_piece.insert(piece, idx);
    }

    pub fn remove(&mut self, piece: PieceId) {
        self.by_piece.remove(&piece);
    }
}
