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
//! Numerical integration of body motion
//!
//! An integrator consumes a body's current state plus the net force computed
//! for this tick and commits the advanced position, velocity and
//! acceleration back onto the body.
//!
//! # Integrators
//!
//! - **Bootstrap Verlet**: semi-implicit Euler on a body's first step, then
//!   a Verlet-style update using the acceleration recorded on the previous step
//! - **RK4**: reserved strategy; every step returns
//!   [`PhysicsError::Unimplemented`]
//!
//! # Timestep Guidelines
//!
//! The timestep is fixed by [`SimulationConfig`] and shared by every body.
//! There is no universally correct value: it must be small compared to the
//! shortest orbital period in the scenario.

use crate::body::{Body, Force, Mass, Velocity};
use crate::config::{IntegratorKind, SimulationConfig};
use crate::error::{PhysicsError, Result};

mod rk4;
mod verlet;

pub use rk4::Rk4Integrator;
pub use verlet::BootstrapVerletIntegrator;

/// Calculate kinetic energy for a single body
///
/// KE = 0.5 * m * v²
pub fn kinetic_energy(velocity: &Velocity, mass: &Mass) -> f64 {
    let v_sq = velocity.dx() * velocity.dx() + velocity.dy() * velocity.dy();
    0.5 * mass.value() * v_sq
}

/// Check that a timestep is usable
///
/// Rejects non-positive and non-finite values. Values that are legal but
/// numerically suspicious only produce a warning.
pub fn check_timestep(dt: f64) -> Result<()> {
    if dt <= 0.0 || !dt.is_finite() {
        return Err(PhysicsError::InvalidConfig {
            field: "timestep",
            reason: format!("{} must be positive and finite", dt),
        });
    }

    if dt < 1e-9 {
        log::warn!("Timestep {:e} is extremely small and may lose precision", dt);
    }

    Ok(())
}

/// Trait for numerical integration methods
///
/// Integrators are stateless apart from their configuration; all per-body
/// state, including whether the body has been stepped before, lives on the
/// [`Body`] itself.
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Get the timestep used by this integrator
    fn timestep(&self) -> f64;

    /// Set the timestep for this integrator
    ///
    /// The previous timestep is kept if `dt` is rejected.
    fn set_timestep(&mut self, dt: f64) -> Result<()>;

    /// Validate the current timestep
    fn validate_timestep(&self) -> Result<()> {
        check_timestep(self.timestep())
    }

    /// Advance one body by one timestep under `force`
    ///
    /// The body's pre-step position is appended to its trail before the new
    /// state is committed.
    fn step(&self, body: &mut Body, force: Force) -> Result<()>;
}

/// Build the integrator selected by a configuration
pub fn integrator_for(config: &SimulationConfig) -> Box<dyn Integrator> {
    match config.integrator {
        IntegratorKind::Verlet => Box::new(BootstrapVerletIntegrator::new(config)),
        IntegratorKind::Rk4 => Box::new(Rk4Integrator::new(config)),
    }
}
