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
//! Bootstrap Verlet-style integrator
//!
//! The Verlet-style update needs the acceleration recorded on the previous
//! step, which a freshly added body does not have. Each body therefore
//! carries an [`IntegrationState`]: the first step uses semi-implicit Euler
//! and records the acceleration it computed, and every later step uses the
//! Verlet-style update below.
//!
//! # Algorithm
//!
//! First step (uninitialized body):
//!
//! ```text
//! a = F(x(t))/m
//! v(t + dt) = v(t) + a*dt
//! x(t + dt) = x(t) + v(t + dt)*dt
//! ```
//!
//! Later steps, with `a_old` the acceleration recorded on the previous step
//! (evaluated at x(t - dt)) and `a_new = F(x(t))/m` from this tick's forces:
//!
//! ```text
//! x(t + dt) = x(t) + v(t)*dt + 0.5*a_old*dt²
//! v(t + dt) = v(t) + 0.5*(a_old + a_new)*dt
//! a_old     = a_new
//! ```
//!
//! Forces are evaluated once per tick at the pre-step positions, so both
//! accelerations lag one step behind the textbook velocity Verlet scheme.
//! The lag makes the velocity update first order: energy drifts linearly in
//! time at a rate proportional to `dt`. The position update reads only
//! pre-step state, and `a_old` is replaced only after both updates.
//!
//! [`IntegrationState`]: crate::body::IntegrationState

use super::{check_timestep, Integrator};
use crate::body::{Acceleration, Body, Force, Position, Velocity};
use crate::config::SimulationConfig;
use crate::error::Result;

/// Verlet-style integrator with a semi-implicit Euler first step
///
/// # Example
///
/// ```
/// use nbody_engine::body::{Body, BodyDescriptor, BodyId, Force, Position, Velocity};
/// use nbody_engine::config::SimulationConfig;
/// use nbody_engine::integration::{BootstrapVerletIntegrator, Integrator};
///
/// let config = SimulationConfig::new(0.5, 0.5, 0.01, 4);
/// let integrator = BootstrapVerletIntegrator::new(&config);
///
/// let descriptor = BodyDescriptor::new(2.0, Position::new(0.0, 0.0), Velocity::new(1.0, 0.0));
/// let mut body = Body::from_descriptor(BodyId::new(0), descriptor).unwrap();
/// integrator.step(&mut body, Force::new(4.0, 0.0)).unwrap();
///
/// assert_eq!(body.velocity(), Velocity::new(2.0, 0.0));
/// assert_eq!(body.position(), Position::new(1.0, 0.0));
/// assert!(body.is_initialized());
/// ```
pub struct BootstrapVerletIntegrator {
    timestep: f64,
    max_trail_length: usize,
}

impl BootstrapVerletIntegrator {
    /// Create an integrator from the timestep and trail cap of `config`
    ///
    /// # Panics
    ///
    /// Panics if the timestep is non-positive, NaN, or infinite
    pub fn new(config: &SimulationConfig) -> Self {
        assert!(
            config.timestep > 0.0 && config.timestep.is_finite(),
            "Timestep must be positive and finite"
        );
        BootstrapVerletIntegrator {
            timestep: config.timestep,
            max_trail_length: config.max_trail_length,
        }
    }

    /// Maximum number of past positions kept per body
    pub fn max_trail_length(&self) -> usize {
        self.max_trail_length
    }

    fn euler(&self, body: &Body, a: Acceleration) -> (Position, Velocity) {
        let dt = self.timestep;
        let pos = body.position();
        let vel = body.velocity();

        let new_vel = Velocity::new(vel.dx() + a.ax() * dt, vel.dy() + a.ay() * dt);
        let new_pos = Position::new(pos.x() + new_vel.dx() * dt, pos.y() + new_vel.dy() * dt);
        (new_pos, new_vel)
    }

    fn verlet(&self, body: &Body, a_new: Acceleration) -> (Position, Velocity) {
        let dt = self.timestep;
        let dt_sq = dt * dt;
        let pos = body.position();
        let vel = body.velocity();
        let a_old = body.acceleration();

        let new_pos = Position::new(
            pos.x() + vel.dx() * dt + 0.5 * a_old.ax() * dt_sq,
            pos.y() + vel.dy() * dt + 0.5 * a_old.ay() * dt_sq,
        );
        let new_vel = Velocity::new(
            vel.dx() + 0.5 * (a_old.ax() + a_new.ax()) * dt,
            vel.dy() + 0.5 * (a_old.ay() + a_new.ay()) * dt,
        );
        (new_pos, new_vel)
    }
}

impl Integrator for BootstrapVerletIntegrator {
    fn name(&self) -> &str {
        "Bootstrap Verlet"
    }

    fn timestep(&self) -> f64 {
        self.timestep
    }

    fn set_timestep(&mut self, dt: f64) -> Result<()> {
        check_timestep(dt)?;
        self.timestep = dt;
        Ok(())
    }

    fn step(&self, body: &mut Body, force: Force) -> Result<()> {
        let a_new = Acceleration::from_force(&force, &body.mass());

        let (position, velocity) = if body.is_initialized() {
            self.verlet(body, a_new)
        } else {
            self.euler(body, a_new)
        };

        if !position.is_valid() || !velocity.is_valid() {
            log::warn!(
                "{} became non-finite after integration: position ({}, {}), velocity ({}, {})",
                body.id(),
                position.x(),
                position.y(),
                velocity.dx(),
                velocity.dy()
            );
        }

        body.advance(position, velocity, a_new, self.max_trail_length);
        Ok(())
    }
}
