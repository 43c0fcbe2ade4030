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
//! Runge-Kutta 4th order (RK4) integrator placeholder
//!
//! RK4 needs four force evaluations per step at intermediate positions,
//! which would require the force engine to be re-run inside the integrator.
//! The strategy is kept selectable through [`IntegratorKind::Rk4`] so that
//! callers get an explicit error instead of a silent fallback to Verlet.
//!
//! [`IntegratorKind::Rk4`]: crate::config::IntegratorKind::Rk4

use super::{check_timestep, Integrator};
use crate::body::{Body, Force};
use crate::config::SimulationConfig;
use crate::error::{PhysicsError, Result};

/// RK4 strategy that rejects every step with [`PhysicsError::Unimplemented`]
///
/// # Example
///
/// ```
/// use nbody_engine::body::{Body, BodyDescriptor, BodyId, Force, Position, Velocity};
/// use nbody_engine::config::SimulationConfig;
/// use nbody_engine::error::PhysicsError;
/// use nbody_engine::integration::{Integrator, Rk4Integrator};
///
/// let integrator = Rk4Integrator::new(&SimulationConfig::new(0.1, 0.5, 0.01, 0));
/// let descriptor = BodyDescriptor::new(1.0, Position::zero(), Velocity::zero());
/// let mut body = Body::from_descriptor(BodyId::new(0), descriptor).unwrap();
///
/// let err = integrator.step(&mut body, Force::zero()).unwrap_err();
/// assert!(matches!(err, PhysicsError::Unimplemented(_)));
/// ```
pub struct Rk4Integrator {
    timestep: f64,
}

impl Rk4Integrator {
    /// Create the placeholder with the timestep of `config`
    ///
    /// # Panics
    ///
    /// Panics if the timestep is non-positive, NaN, or infinite
    pub fn new(config: &SimulationConfig) -> Self {
        assert!(
            config.timestep > 0.0 && config.timestep.is_finite(),
            "Timestep must be positive and finite"
        );
        Rk4Integrator {
            timestep: config.timestep,
        }
    }
}

impl Integrator for Rk4Integrator {
    fn name(&self) -> &str {
        "RK4 (unimplemented)"
    }

    fn timestep(&self) -> f64 {
        self.timestep
    }

    fn set_timestep(&mut self, dt: f64) -> Result<()> {
        check_timestep(dt)?;
        self.timestep = dt;
        Ok(())
    }

    fn step(&self, _body: &mut Body, _force: Force) -> Result<()> {
        Err(PhysicsError::Unimplemented("RK4 integration"))
    }
}
