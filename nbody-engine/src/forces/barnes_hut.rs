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
//! Barnes-Hut force engine
//!
//! Each call rebuilds the quad-tree from the current positions (reusing the
//! engine's node arena), then queries it once per body. Tree construction is
//! sequential; the queries only read the finished tree and run on the rayon
//! pool when parallel evaluation is enabled.

use super::{ForceEngine, Gravity};
use crate::body::{BasicBody, Force};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::tree::{Boundary, QuadTree};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Tree-approximate O(N log N) force engine
pub struct BarnesHutEngine {
    gravity: Gravity,
    theta: f64,
    #[cfg(feature = "parallel")]
    parallel: bool,
    tree: QuadTree,
}

impl BarnesHutEngine {
    /// Create an engine from the gravity, opening-angle and depth settings of `config`
    pub fn new(config: &SimulationConfig) -> Self {
        log::debug!(
            "BarnesHutEngine: G = {:e}, softening = {:e}, theta = {}, max depth = {}, parallel = {}",
            config.gravitational_constant,
            config.softening,
            config.theta,
            config.max_tree_depth,
            config.use_parallel()
        );
        BarnesHutEngine {
            gravity: Gravity::from_config(config),
            theta: config.theta,
            #[cfg(feature = "parallel")]
            parallel: config.use_parallel(),
            tree: QuadTree::new(config.max_tree_depth),
        }
    }

    /// Opening-angle threshold θ
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Pair law used by this engine
    pub fn gravity(&self) -> &Gravity {
        &self.gravity
    }

    /// Tree built by the most recent call to `compute_forces`
    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }
}

impl ForceEngine for BarnesHutEngine {
    fn name(&self) -> &str {
        "Barnes-Hut"
    }

    fn compute_forces(
        &mut self,
        bodies: &[BasicBody],
        boundary: &Boundary,
        forces: &mut Vec<Force>,
    ) -> Result<()> {
        forces.clear();
        self.tree.rebuild(bodies, *boundary)?;

        let tree = &self.tree;
        let gravity = &self.gravity;
        let theta = self.theta;

        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                bodies
                    .par_iter()
                    .map(|body| tree.calculate_force(body, gravity, theta))
                    .collect_into_vec(forces);
                return Ok(());
            }
        }

        forces.extend(bodies.iter().map(|body| tree.calculate_force(body, gravity, theta)));
        Ok(())
    }

    fn spatial_tree(&self) -> Option<&QuadTree> {
        Some(&self.tree)
    }
}
