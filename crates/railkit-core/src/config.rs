//! Engine configuration loaded from TOML.
//!
//! Every field has a default, so a partial (or empty) config file is valid.
//! Call [`EngineConfig::validate`] after loading; deserialization alone does
//! not range-check values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_max_iterations() -> u32 {
    32
}
const fn default_arrival_dist() -> f64 {
    0.01
}

// ---------------------------------------------------------------------------
// SolverConfig
// ---------------------------------------------------------------------------

/// Chain-solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum CCD passes per solve (default: 32). The solver core has no
    /// internal cap; this bounds the owning loop.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Arrival tolerance: end-effector-to-target distance at which the
    /// solve counts as converged (default: 0.01).
    #[serde(default = "default_arrival_dist")]
    pub arrival_dist: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            arrival_dist: default_arrival_dist(),
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroMaxIterations);
        }
        if !self.arrival_dist.is_finite() || self.arrival_dist < 0.0 {
            return Err(ConfigError::InvalidArrivalDist(self.arrival_dist));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RouteConfig
// ---------------------------------------------------------------------------

/// Path-search settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Maximum node expansions per query; 0 means unbounded (default).
    /// A query that exhausts the budget reports no path.
    #[serde(default)]
    pub max_expansions: u32,
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Complete engine configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub solver: SolverConfig,

    #[serde(default)]
    pub route: RouteConfig,
}

impl EngineConfig {
    /// Parse from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver.validate()
    }
}
