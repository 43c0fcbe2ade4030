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
//! Simulation orchestrator
//!
//! A [`Simulation`] owns the body store, the force engine and the integrator
//! selected by its [`SimulationConfig`], and drives one tick at a time.
//!
//! # Tick phases
//!
//! Each call to [`Simulation::step`] runs these phases in order:
//!
//! 1. **Bounds**: the padded box enclosing every current position
//! 2. **Forces**: the engine turns a mass/position snapshot into one net
//!    force per body (the Barnes-Hut engine rebuilds its tree here)
//! 3. **Integration**: every body is advanced under its net force, which
//!    also appends its pre-step position to its trail
//!
//! Bodies are visited in the store's insertion order, so a simulation with
//! the same configuration and inputs produces the same trajectory.

use crate::body::{BasicBody, Body, BodyDescriptor, BodyId, BodyStore, Force};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::forces::{engine_for, ForceEngine, Gravity};
use crate::integration::{integrator_for, Integrator};
use crate::tree::{Boundary, QuadTree};

mod diagnostics;

pub use diagnostics::Diagnostics;

/// N-body simulation driven one tick at a time
///
/// # Examples
///
/// ```
/// use nbody_engine::body::{BodyDescriptor, Position, Velocity};
/// use nbody_engine::config::SimulationConfig;
/// use nbody_engine::simulation::Simulation;
///
/// let config = SimulationConfig::new(0.01, 0.5, 0.1, 16).with_gravitational_constant(1.0);
/// let mut sim = Simulation::new(config).unwrap();
/// sim.add_body(BodyDescriptor::new(10.0, Position::new(0.0, 0.0), Velocity::zero())).unwrap();
/// sim.add_body(BodyDescriptor::new(1.0, Position::new(5.0, 0.0), Velocity::new(0.0, 1.4))).unwrap();
///
/// sim.run(100).unwrap();
/// assert_eq!(sim.tick_count(), 100);
/// assert_eq!(sim.bodies()[1].trail().len(), 16);
/// ```
pub struct Simulation {
    config: SimulationConfig,
    gravity: Gravity,
    store: BodyStore,
    engine: Box<dyn ForceEngine>,
    integrator: Box<dyn Integrator>,
    boundary: Option<Boundary>,
    projections: Vec<BasicBody>,
    forces: Vec<Force>,
    tick: u64,
    elapsed: f64,
}

impl Simulation {
    /// Create an empty simulation
    ///
    /// Returns [`PhysicsError::InvalidConfig`](crate::error::PhysicsError::InvalidConfig)
    /// if any configuration value is outside its domain.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let engine = engine_for(&config);
        let integrator = integrator_for(&config);
        log::debug!(
            "Simulation: engine = {}, integrator = {}, dt = {}, theta = {}, softening = {:e}, trail cap = {}",
            engine.name(),
            integrator.name(),
            config.timestep,
            config.theta,
            config.softening,
            config.max_trail_length
        );

        Ok(Simulation {
            gravity: Gravity::from_config(&config),
            config,
            store: BodyStore::new(),
            engine,
            integrator,
            boundary: None,
            projections: Vec::new(),
            forces: Vec::new(),
            tick: 0,
            elapsed: 0.0,
        })
    }

    /// Create a simulation populated from `descriptors` in order
    pub fn with_bodies<I>(config: SimulationConfig, descriptors: I) -> Result<Self>
    where
        I: IntoIterator<Item = BodyDescriptor>,
    {
        let mut sim = Simulation::new(config)?;
        for descriptor in descriptors {
            sim.add_body(descriptor)?;
        }
        Ok(sim)
    }

    /// Add a body; it takes part in the next tick
    pub fn add_body(&mut self, descriptor: BodyDescriptor) -> Result<BodyId> {
        self.store.add(descriptor)
    }

    /// Remove a body by handle and return its final state
    pub fn remove_body(&mut self, id: BodyId) -> Result<Body> {
        self.store.remove(id)
    }

    /// Look up a body by handle
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.store.get(id)
    }

    /// All bodies in insertion order
    pub fn bodies(&self) -> &[Body] {
        self.store.as_slice()
    }

    /// The underlying body store
    pub fn store(&self) -> &BodyStore {
        &self.store
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when there are no bodies
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Configuration this simulation was built with
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Active force engine
    pub fn engine(&self) -> &dyn ForceEngine {
        self.engine.as_ref()
    }

    /// Active integrator
    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    /// Box used by the most recent tick, `None` before the first tick or
    /// when that tick had no bodies
    pub fn boundary(&self) -> Option<Boundary> {
        self.boundary
    }

    /// Tree built by the most recent tick when the Barnes-Hut engine is active
    pub fn tree(&self) -> Option<&QuadTree> {
        self.engine.spatial_tree()
    }

    /// Number of completed ticks
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Simulated time elapsed over all completed ticks
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    /// Advance every body by one timestep
    ///
    /// On error the tick counter does not advance. Bodies already integrated
    /// before the failing one keep their new state.
    pub fn step(&mut self) -> Result<()> {
        self.store.project_into(&mut self.projections);
        self.boundary = Boundary::enclosing(&self.projections, self.config.boundary_padding)?;

        if let Some(boundary) = self.boundary {
            self.engine
                .compute_forces(&self.projections, &boundary, &mut self.forces)?;

            for (body, force) in self.store.iter_mut().zip(&self.forces) {
                body.set_net_force(*force);
                self.integrator.step(body, *force)?;
            }
        }

        self.tick += 1;
        self.elapsed += self.integrator.timestep();

        log::trace!(
            "tick {}: {} bodies, {} tree nodes",
            self.tick,
            self.store.len(),
            self.tree().map_or(0, QuadTree::node_count)
        );
        Ok(())
    }

    /// Run `ticks` consecutive steps, stopping at the first error
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Measure conserved quantities for the current state
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::measure(self.store.as_slice(), &self.gravity, self.tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Position, Velocity};
    use crate::config::{ForceEngineKind, IntegratorKind};
    use crate::error::PhysicsError;

    fn config() -> SimulationConfig {
        SimulationConfig::new(0.5, 0.5, 0.1, 3)
            .with_gravitational_constant(1.0)
            .with_parallel(false)
    }

    fn at(x: f64, y: f64) -> BodyDescriptor {
        BodyDescriptor::new(1.0, Position::new(x, y), Velocity::zero())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Simulation::new(SimulationConfig::new(0.0, 0.5, 0.1, 3));
        assert!(matches!(
            result.err(),
            Some(PhysicsError::InvalidConfig { field: "timestep", .. })
        ));
    }

    #[test]
    fn test_empty_step_advances_clock() {
        let mut sim = Simulation::new(config()).unwrap();
        sim.run(4).unwrap();
        assert_eq!(sim.tick_count(), 4);
        assert_eq!(sim.elapsed_time(), 2.0);
        assert!(sim.boundary().is_none());
    }

    #[test]
    fn test_single_body_moves_freely() {
        let mut sim = Simulation::new(config()).unwrap();
        let id = sim
            .add_body(BodyDescriptor::new(2.0, Position::new(1.0, 1.0), Velocity::new(2.0, 0.0)))
            .unwrap();

        sim.run(3).unwrap();

        let body = sim.body(id).unwrap();
        assert_eq!(body.position(), Position::new(4.0, 1.0));
        assert_eq!(body.net_force(), Force::zero());
        assert_eq!(body.trail().len(), 3);
    }

    #[test]
    fn test_bodies_attract() {
        let mut sim = Simulation::with_bodies(config(), [at(-1.0, 0.0), at(1.0, 0.0)]).unwrap();
        sim.step().unwrap();

        let bodies = sim.bodies();
        assert!(bodies[0].velocity().dx() > 0.0);
        assert!(bodies[1].velocity().dx() < 0.0);
        assert_eq!(bodies[0].net_force(), -bodies[1].net_force());
        assert!(sim.tree().is_some());
    }

    #[test]
    fn test_boundary_tracks_bodies() {
        let mut sim = Simulation::with_bodies(config(), [at(-3.0, 0.0), at(5.0, 2.0)]).unwrap();
        sim.step().unwrap();
        let boundary = sim.boundary().unwrap();
        for body in sim.bodies() {
            assert!(boundary.contains(&body.previous_position()));
        }
    }

    #[test]
    fn test_added_body_joins_next_tick() {
        let mut sim = Simulation::with_bodies(config(), [at(0.0, 0.0)]).unwrap();
        sim.step().unwrap();
        assert_eq!(sim.bodies()[0].velocity(), Velocity::zero());

        let far = sim.add_body(at(100.0, 0.0)).unwrap();
        sim.step().unwrap();
        assert!(sim.bodies()[0].velocity().dx() > 0.0);
        assert!(sim.body(far).unwrap().is_initialized());
        assert_eq!(sim.tree().unwrap().len(), 2);
    }

    #[test]
    fn test_remove_body() {
        let mut sim = Simulation::with_bodies(config(), [at(0.0, 0.0), at(1.0, 0.0)]).unwrap();
        let id = sim.bodies()[0].id();
        let removed = sim.remove_body(id).unwrap();
        assert_eq!(removed.id(), id);
        assert_eq!(sim.len(), 1);
        assert!(sim.body(id).is_none());
        assert_eq!(sim.remove_body(id).unwrap_err(), PhysicsError::UnknownBody(id));
    }

    #[test]
    fn test_direct_engine_selected() {
        let sim = Simulation::new(config().with_force_engine(ForceEngineKind::Direct)).unwrap();
        assert_eq!(sim.engine().name(), "Direct");
        assert!(sim.tree().is_none());
    }

    #[test]
    fn test_rk4_step_fails_without_advancing() {
        let config = config().with_integrator(IntegratorKind::Rk4);
        let mut sim = Simulation::with_bodies(config, [at(0.0, 0.0)]).unwrap();

        let err = sim.step().unwrap_err();
        assert!(matches!(err, PhysicsError::Unimplemented(_)));
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.bodies()[0].position(), Position::zero());
    }

    #[test]
    fn test_diagnostics_track_tick() {
        let mut sim = Simulation::with_bodies(config(), [at(0.0, 0.0), at(2.0, 0.0)]).unwrap();
        sim.run(2).unwrap();
        let d = sim.diagnostics();
        assert_eq!(d.tick, 2);
        assert_eq!(d.body_count, 2);
        assert!(d.potential_energy < 0.0);
    }
}
