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
//! Gravitational force engines
//!
//! Two interchangeable strategies turn a snapshot of body masses and
//! positions into one net force per body:
//!
//! - [`DirectForceEngine`]: exact pairwise summation, O(N²). Used for
//!   validation and small populations.
//! - [`BarnesHutEngine`]: quad-tree approximation, O(N log N), whose accuracy
//!   is controlled by the opening angle θ.
//!
//! # Softened Newtonian gravity
//!
//! Both engines share the same pair law. With displacement `r` from the
//! target to the source and softening length ε:
//!
//! ```text
//! d = sqrt(|r|² + ε²)
//! F = G * m₁ * m₂ / d² * (r / d)
//! ```
//!
//! Softening keeps `d` strictly positive, so coincident bodies produce a
//! zero (not infinite) force and no other division guard is needed.

use crate::body::{BasicBody, Force, Position};
use crate::config::{ForceEngineKind, SimulationConfig};
use crate::error::Result;
use crate::tree::{Boundary, QuadTree};

mod barnes_hut;
mod direct;

pub use barnes_hut::BarnesHutEngine;
pub use direct::DirectForceEngine;

/// Softened Newtonian pair law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    constant: f64,
    softening: f64,
}

impl Gravity {
    /// Create a pair law with gravitational constant `g` and softening length `softening`
    pub fn new(g: f64, softening: f64) -> Self {
        Gravity { constant: g, softening }
    }

    /// Pair law described by a configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Gravity::new(config.gravitational_constant, config.softening)
    }

    /// Gravitational constant
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Softening length ε
    pub fn softening(&self) -> f64 {
        self.softening
    }

    /// Softened distance `sqrt(dx² + dy² + ε²)` between two points
    #[inline]
    pub fn softened_distance(&self, a: &Position, b: &Position) -> f64 {
        let dx = b.x() - a.x();
        let dy = b.y() - a.y();
        (dx * dx + dy * dy + self.softening * self.softening).sqrt()
    }

    /// Force on `target` exerted by a point mass `source_mass` at `source`
    ///
    /// The mass product is formed before scaling by G so that swapping the
    /// two bodies yields the exact negation.
    #[inline]
    pub fn force_between(&self, target: &BasicBody, source: &Position, source_mass: f64) -> Force {
        let dx = source.x() - target.position.x();
        let dy = source.y() - target.position.y();
        let softened_distance_squared = dx * dx + dy * dy + self.softening * self.softening;
        let softened_distance = softened_distance_squared.sqrt();

        let magnitude = self.constant * (target.mass * source_mass) / softened_distance_squared;
        Force::new(
            magnitude * dx / softened_distance,
            magnitude * dy / softened_distance,
        )
    }

    /// Force on body `a` exerted by body `b`
    #[inline]
    pub fn pair_force(&self, a: &BasicBody, b: &BasicBody) -> Force {
        self.force_between(a, &b.position, b.mass)
    }

    /// Softened potential energy of a pair, `-G m₁ m₂ / d`
    pub fn pair_potential(&self, a: &BasicBody, b: &BasicBody) -> f64 {
        -self.constant * (a.mass * b.mass) / self.softened_distance(&a.position, &b.position)
    }
}

/// A strategy that computes the net gravitational force on every body
pub trait ForceEngine: Send + Sync {
    /// Get the name of this engine
    fn name(&self) -> &str;

    /// Compute one net force per body
    ///
    /// `forces` is cleared and refilled so that `forces[i]` is the net force
    /// on `bodies[i]`. `boundary` must enclose every body; engines that do not
    /// partition space ignore it.
    fn compute_forces(
        &mut self,
        bodies: &[BasicBody],
        boundary: &Boundary,
        forces: &mut Vec<Force>,
    ) -> Result<()>;

    /// Tree built by the last call to `compute_forces`, if this engine uses one
    fn spatial_tree(&self) -> Option<&QuadTree> {
        None
    }
}

/// Build the force engine selected by a configuration
pub fn engine_for(config: &SimulationConfig) -> Box<dyn ForceEngine> {
    match config.force_engine {
        ForceEngineKind::Direct => Box::new(DirectForceEngine::new(config)),
        ForceEngineKind::BarnesHut => Box::new(BarnesHutEngine::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyId;

    fn body(id: u64, mass: f64, x: f64, y: f64) -> BasicBody {
        BasicBody::new(BodyId::new(id), mass, Position::new(x, y))
    }

    #[test]
    fn test_force_points_toward_source() {
        let gravity = Gravity::new(1.0, 0.0);
        let a = body(0, 2.0, 0.0, 0.0);
        let b = body(1, 3.0, 2.0, 0.0);

        let f = gravity.pair_force(&a, &b);
        // G m1 m2 / r² = 6 / 4
        assert_eq!(f, Force::new(1.5, 0.0));
    }

    #[test]
    fn test_pair_force_is_exactly_antisymmetric() {
        let gravity = Gravity::new(6.674e-11, 1e3);
        let a = body(0, 5.972e24, 1.496e11, -3.0e9);
        let b = body(1, 7.3e22, 1.49984e11, 2.5e8);

        let ab = gravity.pair_force(&a, &b);
        let ba = gravity.pair_force(&b, &a);
        assert_eq!(ab, -ba);
    }

    #[test]
    fn test_softening_bounds_coincident_force() {
        let gravity = Gravity::new(1.0, 0.1);
        let a = body(0, 1.0, 1.0, 1.0);
        let b = body(1, 1.0, 1.0, 1.0);

        let f = gravity.pair_force(&a, &b);
        assert!(f.is_valid());
        assert_eq!(f, Force::zero());
    }

    #[test]
    fn test_softening_reduces_close_range_force() {
        let hard = Gravity::new(1.0, 1e-9);
        let soft = Gravity::new(1.0, 1.0);
        let a = body(0, 1.0, 0.0, 0.0);
        let b = body(1, 1.0, 0.1, 0.0);

        assert!(soft.pair_force(&a, &b).magnitude() < hard.pair_force(&a, &b).magnitude());
        assert!(soft.pair_force(&a, &b).magnitude() < 1.0);
    }

    #[test]
    fn test_pair_potential() {
        let gravity = Gravity::new(2.0, 0.0);
        let a = body(0, 1.0, 0.0, 0.0);
        let b = body(1, 3.0, 0.0, 4.0);
        assert_eq!(gravity.pair_potential(&a, &b), -1.5);
    }

    #[test]
    fn test_engine_factory() {
        let config = SimulationConfig::new(1.0, 0.5, 0.1, 0);
        assert_eq!(engine_for(&config).name(), "Barnes-Hut");

        let config = config.with_force_engine(ForceEngineKind::Direct);
        assert_eq!(engine_for(&config).name(), "Direct");
    }
}
