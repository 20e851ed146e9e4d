//! Clamped cyclic-coordinate-descent solver.
//!
//! One [`solve_step`] call runs a single CCD pass: tip-ward bones first,
//! each swinging the cached end point toward the target by the largest
//! rotation its joint limit grants. The pass verdict distinguishes arrival,
//! normal progress, and a stuck chain (every joint at its limit or the
//! target out of reach).

use nalgebra::{distance, Point2};

use railkit_core::config::SolverConfig;
use railkit_core::IkError;

use crate::chain::{simplify_angle, Chain};

/// Below this end-vector/target-vector magnitude product the rotation is
/// degenerate and replaced with the identity.
const DEGENERATE_MAGNITUDE_PRODUCT: f64 = 1e-4;

/// A pass is productive only if some bone sweeps the end point through an
/// arc longer than this.
const MIN_PRODUCTIVE_ARC: f64 = 1e-5;

// ---------------------------------------------------------------------------
// SolveOutcome
// ---------------------------------------------------------------------------

/// Verdict of one CCD pass.
///
/// These are pass outcomes, not persistent solver states; the owning loop
/// decides when to stop calling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The end point reached the target within the arrival tolerance.
    Success,
    /// The pass moved the end point; call again after refreshing world
    /// positions.
    Processing,
    /// No bone could move the end point appreciably; further passes will
    /// not help.
    Failure,
}

// ---------------------------------------------------------------------------
// solve_step
// ---------------------------------------------------------------------------

/// Run one clamped CCD pass, bending the chain toward `target`.
///
/// Mutates only the bones' `local_angle` fields (never the last bone, never
/// any cached world position). The caller must run
/// [`Chain::refresh_world_positions`] before the next pass; this function
/// has no internal iteration cap.
///
/// # Errors
///
/// [`IkError::ChainTooShort`] for a chain of fewer than 2 bones,
/// [`IkError::InvalidArrivalDistance`] for a non-finite or negative
/// tolerance.
pub fn solve_step(
    chain: &mut Chain,
    target: Point2<f64>,
    arrival_dist: f64,
) -> Result<SolveOutcome, IkError> {
    if !arrival_dist.is_finite() || arrival_dist < 0.0 {
        return Err(IkError::InvalidArrivalDistance(arrival_dist));
    }
    let bones = chain.bones_mut();
    let n = bones.len();
    if n < 2 {
        return Err(IkError::ChainTooShort { len: n });
    }

    let mut end = bones[n - 1].world;
    let mut productive = false;

    for idx in (0..n - 1).rev() {
        let bone = &bones[idx];
        let pivot = bone.world;
        let to_end = end - pivot;
        let to_target = target - pivot;
        let end_mag = to_end.norm();
        let target_mag = to_target.norm();

        // Near-zero vectors make the normalized products blow up; fall
        // back to the identity rotation.
        let (mut cos_rot, mut sin_rot) = if end_mag * target_mag <= DEGENERATE_MAGNITUDE_PRODUCT {
            (1.0, 0.0)
        } else {
            (
                to_end.dot(&to_target) / (end_mag * target_mag),
                to_end.perp(&to_target) / (end_mag * target_mag),
            )
        };

        // Signed rotation that swings `to_end` onto the target ray. The
        // clamp covers acos domain spill from floating rounding.
        let mut rotation = cos_rot.clamp(-1.0, 1.0).acos();
        if sin_rot < 0.0 {
            rotation = -rotation;
        }

        let requested = simplify_angle(bone.local_angle + rotation);
        let granted = requested.clamp(-bone.max_abs_angle, bone.max_abs_angle);
        let mut effective = rotation;
        if granted != requested {
            // The end point must only swing by the rotation the joint
            // limit actually granted, or the stored angle and the visible
            // geometry drift apart.
            effective = rotation - (requested - granted);
            let (sin, cos) = effective.sin_cos();
            sin_rot = sin;
            cos_rot = cos;
        }
        bones[idx].local_angle = granted;

        end = Point2::new(
            pivot.x + cos_rot * to_end.x - sin_rot * to_end.y,
            pivot.y + sin_rot * to_end.x + cos_rot * to_end.y,
        );

        if distance(&end, &target) <= arrival_dist {
            return Ok(SolveOutcome::Success);
        }
        if effective.abs() * end_mag > MIN_PRODUCTIVE_ARC {
            productive = true;
        }
    }

    Ok(if productive {
        SolveOutcome::Processing
    } else {
        SolveOutcome::Failure
    })
}

// ---------------------------------------------------------------------------
// CcdSolver
// ---------------------------------------------------------------------------

/// Configuration for the [`CcdSolver`] driver loop.
#[derive(Debug, Clone, PartialEq)]
pub struct CcdConfig {
    /// Maximum CCD passes per solve.
    pub max_iterations: u32,
    /// Arrival tolerance (end-point-to-target distance).
    pub arrival_dist: f64,
}

impl Default for CcdConfig {
    fn default() -> Self {
        Self {
            max_iterations: 32,
            arrival_dist: 0.01,
        }
    }
}

impl From<&SolverConfig> for CcdConfig {
    fn from(config: &SolverConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            arrival_dist: config.arrival_dist,
        }
    }
}

/// Result of a full [`CcdSolver::solve`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct CcdReport {
    /// Final pass verdict. `Processing` means the iteration cap ran out
    /// while the chain was still making progress.
    pub outcome: SolveOutcome,
    /// Passes executed.
    pub iterations: u32,
    /// End-effector-to-target distance after the final refresh.
    pub end_distance: f64,
}

impl CcdReport {
    pub fn converged(&self) -> bool {
        self.outcome == SolveOutcome::Success
    }
}

/// The owning loop around [`solve_step`]: pass, refresh world positions,
/// repeat until arrival, a stuck chain, or the iteration cap.
pub struct CcdSolver {
    config: CcdConfig,
}

impl CcdSolver {
    pub const fn new(config: CcdConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(CcdConfig::default())
    }

    pub const fn config(&self) -> &CcdConfig {
        &self.config
    }

    /// Bend `chain` toward `target` until arrival, failure, or the cap.
    ///
    /// World positions are refreshed after every pass, so on return the
    /// chain's cached geometry matches its angles.
    ///
    /// # Errors
    ///
    /// Propagates [`solve_step`]'s input validation errors.
    pub fn solve(&self, chain: &mut Chain, target: Point2<f64>) -> Result<CcdReport, IkError> {
        let mut iterations = 0;
        let outcome = loop {
            if iterations == self.config.max_iterations {
                break SolveOutcome::Processing;
            }
            let outcome = solve_step(chain, target, self.config.arrival_dist)?;
            chain.refresh_world_positions();
            iterations += 1;
            match outcome {
                SolveOutcome::Processing => {}
                terminal => break terminal,
            }
        };

        Ok(CcdReport {
            outcome,
            iterations,
            end_distance: chain.end_distance(target),
        })
    }
}
