// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Simulation configuration
//!
//! All numeric constants of a run travel in one immutable
//! [`SimulationConfig`] value that is handed to the force engine, the
//! integrator and the orchestrator at construction. Nothing is read from
//! module-wide state.
//!
//! The opening angle, timestep, softening length and trail cap depend on the
//! scale of the scenario, so they have no defaults and must be given to
//! [`SimulationConfig::new`]. The remaining fields have defaults that can be
//! overridden with the `with_*` builders.
//!
//! The configuration is serde-(de)serializable so a scenario loader can read
//! it from YAML or JSON:
//!
//! ```yaml
//! timestep: 600.0
//! theta: 0.5
//! softening: 1.0e10
//! max_trail_length: 5000
//! force_engine: barnes_hut   # or "direct"
//! integrator: verlet         # or "rk4" (not implemented)
//! ```

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Standard gravitational constant in SI units (m³/(kg⋅s²))
///
/// CODATA 2018 recommended value: 6.67430(15) × 10⁻¹¹ m³/(kg⋅s²)
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;

/// Default depth limit for quad-tree subdivision
///
/// Below this depth a node is 2⁻⁴⁸ of the root extent wide, which is close to
/// the resolution of an f64 coordinate. Bodies that still share a leaf there
/// are kept together in one bucket.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 48;

/// Default half-extent used to pad a zero-width or zero-height bounding box
pub const DEFAULT_BOUNDARY_PADDING: f64 = 1.0;

/// Strategy used to compute net forces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceEngineKind {
    /// Exact pairwise summation, O(N²)
    Direct,
    /// Quad-tree approximation controlled by the opening angle
    #[default]
    BarnesHut,
}

/// Strategy used to advance body state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    /// Semi-implicit Euler on the first step, a Verlet-style update afterwards
    #[default]
    Verlet,
    /// Runge-Kutta 4; declared but not implemented
    Rk4,
}

fn default_gravitational_constant() -> f64 {
    GRAVITATIONAL_CONSTANT
}

fn default_max_tree_depth() -> usize {
    DEFAULT_MAX_TREE_DEPTH
}

fn default_boundary_padding() -> f64 {
    DEFAULT_BOUNDARY_PADDING
}

fn default_parallel() -> bool {
    true
}

/// Immutable parameters of a simulation run
///
/// # Example
///
/// ```
/// use nbody_engine::config::{SimulationConfig, ForceEngineKind};
///
/// let config = SimulationConfig::new(600.0, 0.5, 1e10, 5000)
///     .with_force_engine(ForceEngineKind::Direct);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Gravitational constant G
    #[serde(default = "default_gravitational_constant")]
    pub gravitational_constant: f64,
    /// Time step in seconds
    pub timestep: f64,
    /// Barnes-Hut opening-angle threshold θ
    pub theta: f64,
    /// Softening length ε in meters
    pub softening: f64,
    /// Maximum number of past positions kept per body
    pub max_trail_length: usize,
    /// Depth at which the quad-tree stops subdividing
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,
    /// Half-extent added to a degenerate bounding box axis
    #[serde(default = "default_boundary_padding")]
    pub boundary_padding: f64,
    /// Force computation strategy
    #[serde(default)]
    pub force_engine: ForceEngineKind,
    /// Integration strategy
    #[serde(default)]
    pub integrator: IntegratorKind,
    /// Evaluate forces on the rayon thread pool (requires the `parallel` feature)
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl SimulationConfig {
    /// Create a configuration from the scale-dependent parameters
    ///
    /// # Arguments
    ///
    /// * `timestep` - Time step `dt` in seconds
    /// * `theta` - Opening-angle threshold; smaller is more accurate and slower
    /// * `softening` - Softening length ε in meters, must be positive
    /// * `max_trail_length` - Number of past positions kept per body
    pub fn new(timestep: f64, theta: f64, softening: f64, max_trail_length: usize) -> Self {
        SimulationConfig {
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            timestep,
            theta,
            softening,
            max_trail_length,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            boundary_padding: DEFAULT_BOUNDARY_PADDING,
            force_engine: ForceEngineKind::default(),
            integrator: IntegratorKind::default(),
            parallel: true,
        }
    }

    /// Override the gravitational constant (useful for scaled units)
    pub fn with_gravitational_constant(mut self, g: f64) -> Self {
        self.gravitational_constant = g;
        self
    }

    /// Override the tree depth limit
    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth;
        self
    }

    /// Override the degenerate-box padding
    pub fn with_boundary_padding(mut self, padding: f64) -> Self {
        self.boundary_padding = padding;
        self
    }

    /// Select the force engine
    pub fn with_force_engine(mut self, engine: ForceEngineKind) -> Self {
        self.force_engine = engine;
        self
    }

    /// Select the integrator
    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    /// Enable or disable parallel force evaluation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether force evaluation should run on the thread pool
    pub fn use_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }

    /// Check every field against its valid domain
    pub fn validate(&self) -> Result<()> {
        if !(self.timestep > 0.0 && self.timestep.is_finite()) {
            return Err(invalid("timestep", format!("must be positive and finite, got {}", self.timestep)));
        }
        if !(self.theta >= 0.0 && self.theta.is_finite()) {
            return Err(invalid("theta", format!("must be non-negative and finite, got {}", self.theta)));
        }
        if !(self.softening > 0.0 && self.softening.is_finite()) {
            return Err(invalid("softening", format!("must be positive and finite, got {}", self.softening)));
        }
        if !(self.gravitational_constant >= 0.0 && self.gravitational_constant.is_finite()) {
            return Err(invalid(
                "gravitational_constant",
                format!("must be non-negative and finite, got {}", self.gravitational_constant),
            ));
        }
        if self.max_tree_depth == 0 {
            return Err(invalid("max_tree_depth", "must be at least 1".to_string()));
        }
        if !(self.boundary_padding > 0.0 && self.boundary_padding.is_finite()) {
            return Err(invalid(
                "boundary_padding",
                format!("must be positive and finite, got {}", self.boundary_padding),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> PhysicsError {
    PhysicsError::InvalidConfig { field, reason }
}
