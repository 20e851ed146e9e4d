//! Connectivity-graph domain model shared by the routing and IK engines.
//!
//! A [`TrackGraph`] owns a set of [`Piece`]s, each with a fixed number of
//! connection [`Slot`]s. Connections are symmetric but stored per-slot on
//! both sides; there are no separate edge entities.

use std::fmt;

use nalgebra::Point2;

use crate::error::RouteError;

// ---------------------------------------------------------------------------
// PieceId
// ---------------------------------------------------------------------------

/// Stable identity of a piece within one [`TrackGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// A piece's attachment point, optionally linked to another piece.
///
/// A free slot (`connected == None`) is not traversable by the path finder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slot {
    pub connected: Option<PieceId>,
}

impl Slot {
    pub const fn free() -> Self {
        Self { connected: None }
    }

    pub const fn is_free(&self) -> bool {
        self.connected.is_none()
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A physically-connectable piece: identity, 2D center, connection slots.
#[derive(Debug, Clone)]
pub struct Piece {
    id: PieceId,
    center: Point2<f64>,
    slots: Vec<Slot>,
}

impl Piece {
    pub const fn id(&self) -> PieceId {
        self.id
    }

    pub const fn center(&self) -> Point2<f64> {
        self.center
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Pieces connected at occupied slots, in slot order.
    ///
    /// Duplicates are possible when two pieces are joined at more than one
    /// slot pair; callers must tolerate them.
    pub fn connected_pieces(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.slots.iter().filter_map(|s| s.connected)
    }

    fn first_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(Slot::is_free)
    }
}

// ---------------------------------------------------------------------------
// TrackGraph
// ---------------------------------------------------------------------------

/// The connectivity graph: pieces plus their per-slot links.
///
/// Ids are assigned sequentially on insert and index into the piece store,
/// so lookup is O(1) and iteration order is deterministic.
#[derive(Debug, Clone, Default)]
pub struct TrackGraph {
    pieces: Vec<Piece>,
}

impl TrackGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Add a piece with `slot_count` free slots at the given center.
    pub fn add_piece(&mut self, center: Point2<f64>, slot_count: usize) -> PieceId {
        let id = PieceId(self.pieces.len() as u32);
        self.pieces.push(Piece {
            id,
            center,
            slots: vec![Slot::free(); slot_count],
        });
        id
    }

    /// Look up a piece by id.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownPiece`] if `id` is not in this graph.
    pub fn piece(&self, id: PieceId) -> Result<&Piece, RouteError> {
        self.pieces
            .get(id.0 as usize)
            .ok_or(RouteError::UnknownPiece(id))
    }

    /// Connect `a` and `b` at the first free slot on each side.
    ///
    /// The link is stored symmetrically: `a`'s slot references `b` and
    /// `b`'s slot references `a`. Connecting a piece to itself claims two
    /// of its own slots.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownPiece`] for an id not in the graph, or
    /// [`RouteError::NoFreeSlot`] if either side has no free slot left.
    pub fn connect(&mut self, a: PieceId, b: PieceId) -> Result<(), RouteError> {
        let slot_a = self
            .piece(a)?
            .first_free_slot()
            .ok_or(RouteError::NoFreeSlot(a))?;
        self.pieces[a.0 as usize].slots[slot_a].connected = Some(b);

        // A self-loop must claim a second, distinct slot.
        let slot_b = match self.piece(b)?.first_free_slot() {
            Some(s) => s,
            None => {
                self.pieces[a.0 as usize].slots[slot_a].connected = None;
                return Err(RouteError::NoFreeSlot(b));
            }
        };
        self.pieces[b.0 as usize].slots[slot_b].connected = Some(a);
        Ok(())
    }

    /// Pieces reachable from `id` via occupied connection slots.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownPiece`] if `id` is not in this graph.
    pub fn neighbors(&self, id: PieceId) -> Result<impl Iterator<Item = PieceId> + '_, RouteError> {
        Ok(self.piece(id)?.connected_pieces())
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
}
