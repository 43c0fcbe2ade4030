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
//! Exact pairwise force summation
//!
//! For N bodies the sequential path visits each of the N*(N-1)/2 unordered
//! pairs once and applies the pair force to both bodies with opposite signs,
//! so the forces are antisymmetric by construction.
//!
//! The parallel path gives each rayon worker whole rows: the worker that owns
//! body `i` sums the force from every other body into `forces[i]` and nothing
//! else, so no accumulator has two writers. Every row adds its terms in the
//! same order as the sequential path (ascending partner index), and the pair
//! law negates exactly when its arguments are swapped, so both paths produce
//! bit-identical results.

use super::{ForceEngine, Gravity};
use crate::body::{BasicBody, Force};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::tree::Boundary;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Direct O(N²) force engine
///
/// # Example
///
/// ```
/// use nbody_engine::body::{BasicBody, BodyId, Position};
/// use nbody_engine::config::SimulationConfig;
/// use nbody_engine::forces::{DirectForceEngine, ForceEngine};
/// use nbody_engine::tree::Boundary;
///
/// let config = SimulationConfig::new(1.0, 0.5, 0.01, 0).with_gravitational_constant(1.0);
/// let mut engine = DirectForceEngine::new(&config);
/// let bodies = [
///     BasicBody::new(BodyId::new(0), 1.0, Position::new(0.0, 0.0)),
///     BasicBody::new(BodyId::new(1), 1.0, Position::new(1.0, 0.0)),
/// ];
/// let mut forces = Vec::new();
/// engine.compute_forces(&bodies, &Boundary::new(0.0, 0.0, 1.0, 1.0), &mut forces).unwrap();
/// assert_eq!(forces[0], -forces[1]);
/// ```
pub struct DirectForceEngine {
    gravity: Gravity,
    #[cfg(feature = "parallel")]
    parallel: bool,
}

impl DirectForceEngine {
    /// Create an engine from the gravity parameters of `config`
    pub fn new(config: &SimulationConfig) -> Self {
        log::debug!(
            "DirectForceEngine: G = {:e}, softening = {:e}, parallel = {}",
            config.gravitational_constant,
            config.softening,
            config.use_parallel()
        );
        DirectForceEngine {
            gravity: Gravity::from_config(config),
            #[cfg(feature = "parallel")]
            parallel: config.use_parallel(),
        }
    }

    /// Pair law used by this engine
    pub fn gravity(&self) -> &Gravity {
        &self.gravity
    }

    fn compute_sequential(&self, bodies: &[BasicBody], forces: &mut [Force]) {
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let f = self.gravity.pair_force(&bodies[i], &bodies[j]);
                forces[i] += f;
                forces[j] += -f;
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn compute_parallel(&self, bodies: &[BasicBody], forces: &mut [Force]) {
        let gravity = &self.gravity;
        forces.par_iter_mut().enumerate().for_each(|(i, force)| {
            let target = &bodies[i];
            for (j, other) in bodies.iter().enumerate() {
                if j != i {
                    *force += gravity.pair_force(target, other);
                }
            }
        });
    }
}

impl ForceEngine for DirectForceEngine {
    fn name(&self) -> &str {
        "Direct"
    }

    fn compute_forces(
        &mut self,
        bodies: &[BasicBody],
        _boundary: &Boundary,
        forces: &mut Vec<Force>,
    ) -> Result<()> {
        forces.clear();
        forces.resize(bodies.len(), Force::zero());

        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                self.compute_parallel(bodies, forces);
                return Ok(());
            }
        }

        self.compute_sequential(bodies, forces);
        Ok(())
    }
}
