//! Bone chains and the caller-side forward-kinematics pass.
//!
//! A [`Chain`] is an ordered bone sequence: index 0 is the root (position
//! anchored), the last bone is the free end-effector marker. Each bone
//! stores its rotation relative to its parent, a joint limit, the fixed
//! distance to the next bone, and a cached world position. The solver
//! updates local angles only; [`Chain::refresh_world_positions`] rebuilds
//! the cached positions from the angles.

use std::f64::consts::{PI, TAU};

use nalgebra::{distance, Point2, Vector2};

use railkit_core::IkError;

/// Wrap an angle into `[-π, π]`.
///
/// Inputs already in range come back unchanged.
pub fn simplify_angle(angle: f64) -> f64 {
    let mut wrapped = angle % TAU;
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped < -PI {
        wrapped += TAU;
    }
    wrapped
}

// ---------------------------------------------------------------------------
// Bone
// ---------------------------------------------------------------------------

/// One jointed segment of a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    /// Rotation relative to the parent bone (the root's parent is the world
    /// x-axis), radians, kept inside `[-π, π]`.
    pub local_angle: f64,
    /// Joint limit: maximum magnitude of `local_angle`. `π` is effectively
    /// unlimited, `0.0` is rigid.
    pub max_abs_angle: f64,
    /// Fixed distance to the next bone; unused on the last bone.
    pub length: f64,
    /// Cached world position, rebuilt by
    /// [`Chain::refresh_world_positions`].
    pub world: Point2<f64>,
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// A root-anchored, tip-free bone chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    bones: Vec<Bone>,
}

impl Chain {
    /// Build a chain from bone world positions with a uniform joint limit.
    ///
    /// Local angles and segment lengths are derived from the given points;
    /// the first point becomes the root anchor.
    ///
    /// # Errors
    ///
    /// [`IkError::ChainTooShort`] for fewer than 2 points,
    /// [`IkError::InvalidJointLimit`] for a non-finite or negative limit,
    /// [`IkError::AngleOutsideLimit`] when the given layout already bends a
    /// joint past the limit.
    pub fn from_points(points: &[Point2<f64>], max_abs_angle: f64) -> Result<Self, IkError> {
        if points.len() < 2 {
            return Err(IkError::ChainTooShort { len: points.len() });
        }

        let mut bones = Vec::with_capacity(points.len());
        let mut prev_heading = 0.0;
        for window in points.windows(2) {
            let segment: Vector2<f64> = window[1] - window[0];
            let heading = segment.y.atan2(segment.x);
            bones.push(Bone {
                local_angle: simplify_angle(heading - prev_heading),
                max_abs_angle,
                length: segment.norm(),
                world: window[0],
            });
            prev_heading = heading;
        }
        // End-effector marker: never rotated, no outgoing segment.
        bones.push(Bone {
            local_angle: 0.0,
            max_abs_angle,
            length: 0.0,
            world: points[points.len() - 1],
        });

        Self::new(bones)
    }

    /// Build a chain from explicit bones.
    ///
    /// # Errors
    ///
    /// Same validation as [`Chain::from_points`].
    pub fn new(bones: Vec<Bone>) -> Result<Self, IkError> {
        if bones.len() < 2 {
            return Err(IkError::ChainTooShort { len: bones.len() });
        }
        for (i, bone) in bones.iter().enumerate() {
            if !bone.max_abs_angle.is_finite() || bone.max_abs_angle < 0.0 {
                return Err(IkError::InvalidJointLimit {
                    bone: i,
                    limit: bone.max_abs_angle,
                });
            }
            // The last bone is a marker; its angle never enters the solve.
            if i < bones.len() - 1 && bone.local_angle.abs() > bone.max_abs_angle {
                return Err(IkError::AngleOutsideLimit { bone: i });
            }
        }
        Ok(Self { bones })
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Mutable access to the bones.
    ///
    /// Joint limits must stay finite and non-negative; construction
    /// validates this and later edits must preserve it.
    pub fn bones_mut(&mut self) -> &mut [Bone] {
        &mut self.bones
    }

    /// The root anchor position.
    pub fn root(&self) -> Point2<f64> {
        self.bones[0].world
    }

    /// The cached end-effector position.
    pub fn end_effector(&self) -> Point2<f64> {
        self.bones[self.bones.len() - 1].world
    }

    /// Distance from the cached end-effector to `target`.
    pub fn end_distance(&self, target: Point2<f64>) -> f64 {
        distance(&self.end_effector(), &target)
    }

    /// Recompute every bone's world position from the local angles.
    ///
    /// This is the forward-kinematics pass the solver deliberately leaves
    /// to the caller; run it after each [`solve_step`](crate::solve_step)
    /// before the next one. The root anchor never moves.
    pub fn refresh_world_positions(&mut self) {
        let mut heading = 0.0;
        for i in 0..self.bones.len() - 1 {
            heading += self.bones[i].local_angle;
            let (sin, cos) = heading.sin_cos();
            let step = Vector2::new(cos, sin) * self.bones[i].length;
            self.bones[i + 1].world = self.bones[i].world + step;
        }
    }
}
