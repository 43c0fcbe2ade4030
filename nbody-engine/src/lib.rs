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
//! # N-body Engine
//!
//! A 2D gravitational N-body engine built around a Barnes-Hut quad-tree,
//! with an exact pairwise engine for validation and small populations.
//!
//! ## Features
//!
//! - **Barnes-Hut forces**: arena-backed quad-tree with an opening-angle
//!   criterion, O(N log N) per tick
//! - **Direct forces**: exact, antisymmetric O(N²) summation
//! - **Softened gravity**: a softening length keeps coincident bodies finite
//! - **Bootstrap Verlet**: semi-implicit Euler on a body's first step, then
//!   a Verlet-style update
//! - **Trails**: bounded per-body position history for rendering
//! - **Parallelization**: optional Rayon integration for force evaluation
//!
//! ## Example
//!
//! ```rust
//! use nbody_engine::{BodyDescriptor, Position, Simulation, SimulationConfig, Velocity};
//!
//! let config = SimulationConfig::new(1.0 / 60.0, 0.5, 0.05, 32)
//!     .with_gravitational_constant(1.0);
//! let mut sim = Simulation::new(config).unwrap();
//!
//! let sun = sim.add_body(BodyDescriptor::new(1000.0, Position::zero(), Velocity::zero())).unwrap();
//! sim.add_body(BodyDescriptor::new(1.0, Position::new(10.0, 0.0), Velocity::new(0.0, 10.0))).unwrap();
//!
//! sim.run(60).unwrap();
//! assert!(sim.body(sun).unwrap().is_initialized());
//! ```
//!
//! The crate logs through the [`log`] facade and never installs a logger.

#![warn(missing_docs)]

/// Bodies, their components and the body store
pub mod body;

/// Simulation parameters
pub mod config;

/// Error types
pub mod error;

/// Force engines and the softened pair law
pub mod forces;

/// Numerical integration methods
pub mod integration;

/// Tick orchestration and diagnostics
pub mod simulation;

/// Spatial partitioning
pub mod tree;

pub use body::{Body, BodyDescriptor, BodyId, Force, Mass, Position, Velocity};
pub use config::{ForceEngineKind, IntegratorKind, SimulationConfig};
pub use error::{PhysicsError, Result};
pub use simulation::{Diagnostics, Simulation};
