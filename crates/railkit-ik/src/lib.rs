//! Inverse kinematics for flexible track segments.
//!
//! Bends a root-anchored chain of jointed bones so its free end reaches a
//! target point, honoring per-joint angle limits, via clamped cyclic
//! coordinate descent (CCD).
//!
//! # Architecture
//!
//! ```text
//! Chain (bones, world positions) ──► solve_step ──► updated local angles
//!           ▲                                              │
//!           └────────── refresh_world_positions ◄──────────┘
//! ```
//!
//! [`solve_step`] runs one CCD pass and mutates only the bones' local
//! angles; it never propagates world transforms down the chain. The caller
//! must run [`Chain::refresh_world_positions`] between passes, or the next
//! pass operates on stale positions. [`CcdSolver`] packages that loop with
//! an iteration cap for callers that don't need per-pass control.

pub mod chain;
pub mod solver;

pub use chain::{simplify_angle, Bone, Chain};
pub use solver::{solve_step, CcdConfig, CcdReport, CcdSolver, SolveOutcome};
