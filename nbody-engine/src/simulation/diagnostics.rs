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
//! Conserved-quantity summaries of a body population

use serde::Serialize;

use crate::body::{BasicBody, Body, Position};
use crate::forces::Gravity;
use crate::integration::kinetic_energy;

/// Snapshot of global quantities at one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Tick the snapshot was taken at
    pub tick: u64,
    /// Number of bodies measured
    pub body_count: usize,
    /// Sum of all masses
    pub total_mass: f64,
    /// Sum of 0.5 * m * v²
    pub kinetic_energy: f64,
    /// Softened pairwise potential energy, -G m₁ m₂ / d over unordered pairs
    pub potential_energy: f64,
    /// Total linear momentum
    pub momentum: [f64; 2],
    /// Mass-weighted mean position, `None` for an empty population
    pub center_of_mass: Option<Position>,
}

impl Diagnostics {
    /// Measure `bodies` under the pair law `gravity`
    ///
    /// The potential term visits every pair and so costs O(N²).
    pub fn measure(bodies: &[Body], gravity: &Gravity, tick: u64) -> Self {
        let mut total_mass = 0.0;
        let mut kinetic = 0.0;
        let mut momentum = [0.0, 0.0];
        let mut weighted = [0.0, 0.0];

        for body in bodies {
            let m = body.mass().value();
            let p = body.momentum();
            total_mass += m;
            kinetic += kinetic_energy(&body.velocity(), &body.mass());
            momentum[0] += p[0];
            momentum[1] += p[1];
            weighted[0] += m * body.position().x();
            weighted[1] += m * body.position().y();
        }

        let projections: Vec<BasicBody> = bodies.iter().map(Body::basic).collect();
        let mut potential = 0.0;
        for (i, a) in projections.iter().enumerate() {
            for b in &projections[i + 1..] {
                potential += gravity.pair_potential(a, b);
            }
        }

        let center_of_mass = (total_mass > 0.0)
            .then(|| Position::new(weighted[0] / total_mass, weighted[1] / total_mass));

        Diagnostics {
            tick,
            body_count: bodies.len(),
            total_mass,
            kinetic_energy: kinetic,
            potential_energy: potential,
            momentum,
            center_of_mass,
        }
    }

    /// Kinetic plus potential energy
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }

    /// Magnitude of the total momentum vector
    pub fn momentum_magnitude(&self) -> f64 {
        (self.momentum[0] * self.momentum[0] + self.momentum[1] * self.momentum[1]).sqrt()
    }
}
