use thiserror::Error;

use crate::types::PieceId;

/// Top-level error type for railkit-core.
#[derive(Debug, Error)]
pub enum RailkitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    #[error("IK error: {0}")]
    Ik(#[from] IkError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid arrival_dist: {0} (must be finite and >= 0)")]
    InvalidArrivalDist(f64),

    #[error("Invalid max_iterations: 0 (must be > 0)")]
    ZeroMaxIterations,
}

/// Path-search input errors.
///
/// Only malformed inputs are errors; an unreachable goal is an ordinary
/// empty-path result, never a `RouteError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Unknown piece: {0}")]
    UnknownPiece(PieceId),

    #[error("No free connection slot on piece {0}")]
    NoFreeSlot(PieceId),
}

/// Chain-solver input errors.
///
/// Only malformed inputs are errors; non-convergence is an ordinary
/// `Failure` outcome, never an `IkError`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IkError {
    #[error("Chain too short: {len} bones (need at least 2)")]
    ChainTooShort { len: usize },

    #[error("Invalid arrival distance: {0} (must be finite and >= 0)")]
    InvalidArrivalDistance(f64),

    #[error("Invalid joint limit on bone {bone}: {limit} (must be finite and >= 0)")]
    InvalidJointLimit { bone: usize, limit: f64 },

    #[error("Initial angle on bone {bone} exceeds its joint limit")]
    AngleOutsideLimit { bone: usize },
}
