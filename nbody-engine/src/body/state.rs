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
//! Body state and its projections
//!
//! A [`Body`] holds everything the integrator mutates once per tick plus a
//! bounded trail of past positions. Rendering data (name, radius, colors) is
//! attached by composition through [`RenderAttributes`] and is never read by
//! the physics code.

use super::components::{Acceleration, Force, Mass, Position, Velocity};
use super::id::BodyId;
use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// RGB color triple carried for a rendering collaborator
pub type Rgb = (u8, u8, u8);

/// Rendering-only metadata
///
/// A halo color marks the "black hole" style of drawing a body with an outer
/// ring; it carries no physical meaning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderAttributes {
    /// Display name
    pub name: String,
    /// Drawn radius in meters
    pub radius: f64,
    /// Fill color
    pub color: Rgb,
    /// Optional outline color drawn around the body
    #[serde(default)]
    pub halo_color: Option<Rgb>,
}

impl RenderAttributes {
    /// Create render attributes without a halo
    pub fn new(name: impl Into<String>, radius: f64, color: Rgb) -> Self {
        RenderAttributes {
            name: name.into(),
            radius,
            color,
            halo_color: None,
        }
    }

    /// Add a halo (outline) color
    pub fn with_halo(mut self, halo_color: Rgb) -> Self {
        self.halo_color = Some(halo_color);
        self
    }
}

/// Initial conditions for a body, supplied by a scenario collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDescriptor {
    /// Mass in kilograms, must be positive and finite
    pub mass: f64,
    /// Initial position
    pub position: Position,
    /// Initial velocity
    #[serde(default)]
    pub velocity: Velocity,
    /// Optional rendering metadata
    #[serde(default)]
    pub render: Option<RenderAttributes>,
}

impl BodyDescriptor {
    /// Describe a body by its mass, position and velocity
    pub fn new(mass: f64, position: Position, velocity: Velocity) -> Self {
        BodyDescriptor {
            mass,
            position,
            velocity,
            render: None,
        }
    }

    /// Attach rendering metadata
    pub fn with_render(mut self, render: RenderAttributes) -> Self {
        self.render = Some(render);
        self
    }
}

/// Which integration scheme the next step of a body uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationState {
    /// No acceleration recorded yet; the next step bootstraps with semi-implicit Euler
    Uninitialized,
    /// An acceleration from a previous step exists; Verlet updates apply
    Initialized,
}

/// Mass and position of a body, tagged with its handle
///
/// This is what the spatial tree and force engines consume. Carrying the
/// handle lets self-interaction be excluded by identity instead of by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicBody {
    /// Stable handle of the projected body
    pub id: BodyId,
    /// Mass in kilograms
    pub mass: f64,
    /// Position at projection time
    pub position: Position,
}

impl BasicBody {
    /// Create a projection from its parts
    pub fn new(id: BodyId, mass: f64, position: Position) -> Self {
        BasicBody { id, mass, position }
    }
}

/// A simulated point mass
#[derive(Debug, Clone)]
pub struct Body {
    id: BodyId,
    mass: Mass,
    position: Position,
    previous_position: Position,
    velocity: Velocity,
    acceleration: Acceleration,
    state: IntegrationState,
    net_force: Force,
    trail: VecDeque<Position>,
    render: Option<RenderAttributes>,
}

impl Body {
    /// Build a body from a descriptor, validating mass and initial state
    pub fn from_descriptor(id: BodyId, descriptor: BodyDescriptor) -> Result<Self> {
        let mass = Mass::try_new(descriptor.mass)?;
        if !descriptor.position.is_valid() {
            return Err(PhysicsError::InvalidState { field: "position" });
        }
        if !descriptor.velocity.is_valid() {
            return Err(PhysicsError::InvalidState { field: "velocity" });
        }

        Ok(Body {
            id,
            mass,
            position: descriptor.position,
            previous_position: descriptor.position,
            velocity: descriptor.velocity,
            acceleration: Acceleration::zero(),
            state: IntegrationState::Uninitialized,
            net_force: Force::zero(),
            trail: VecDeque::new(),
            render: descriptor.render,
        })
    }

    /// Stable handle of this body
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Mass of this body
    pub fn mass(&self) -> Mass {
        self.mass
    }

    /// Current position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Position before the most recent integration step
    pub fn previous_position(&self) -> Position {
        self.previous_position
    }

    /// Current velocity
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Acceleration computed during the most recent integration step
    pub fn acceleration(&self) -> Acceleration {
        self.acceleration
    }

    /// Net force computed during the most recent tick
    pub fn net_force(&self) -> Force {
        self.net_force
    }

    /// Integration state of this body
    pub fn integration_state(&self) -> IntegrationState {
        self.state
    }

    /// Whether at least one integration step has completed
    pub fn is_initialized(&self) -> bool {
        self.state == IntegrationState::Initialized
    }

    /// Past positions, oldest first
    pub fn trail(&self) -> &VecDeque<Position> {
        &self.trail
    }

    /// Rendering metadata, if any
    pub fn render(&self) -> Option<&RenderAttributes> {
        self.render.as_ref()
    }

    /// Momentum vector (m·v)
    pub fn momentum(&self) -> [f64; 2] {
        [
            self.mass.value() * self.velocity.dx(),
            self.mass.value() * self.velocity.dy(),
        ]
    }

    /// Project this body for tree construction and force evaluation
    pub fn basic(&self) -> BasicBody {
        BasicBody::new(self.id, self.mass.value(), self.position)
    }

    /// Store the net force for this tick
    pub fn set_net_force(&mut self, force: Force) {
        self.net_force = force;
    }

    /// Commit one integration step
    ///
    /// The pre-step position is appended to the trail (oldest entries are
    /// evicted beyond `max_trail_length`) and remembered as the previous
    /// position; then the new state replaces the old one and the body is
    /// marked initialized.
    pub fn advance(
        &mut self,
        position: Position,
        velocity: Velocity,
        acceleration: Acceleration,
        max_trail_length: usize,
    ) {
        self.trail.push_back(self.position);
        while self.trail.len() > max_trail_length {
            self.trail.pop_front();
        }

        self.previous_position = self.position;
        self.position = position;
        self.velocity = velocity;
        self.acceleration = acceleration;
        self.state = IntegrationState::Initialized;
    }
}
