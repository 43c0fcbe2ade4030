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
//! Newtonian state components in two dimensions
//!
//! Each body carries a position, velocity, acceleration and mass. The types
//! are small `Copy` values with double-precision fields so the integrator and
//! force engines can pass them around freely and across threads.

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub};

/// 2D position in meters
///
/// # Examples
///
/// ```
/// use nbody_engine::body::Position;
///
/// let pos = Position::new(1.0, 2.0);
/// assert_eq!(pos.x(), 1.0);
/// assert!(pos.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Create a new position with the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Create a position at the origin
    pub fn zero() -> Self {
        Position::new(0.0, 0.0)
    }

    /// Get the x coordinate
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Get the y coordinate
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Check if both coordinates are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::zero()
    }
}

/// 2D velocity in meters per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    dx: f64,
    dy: f64,
}

impl Velocity {
    /// Create a new velocity with the given components
    pub fn new(dx: f64, dy: f64) -> Self {
        Velocity { dx, dy }
    }

    /// Create a zero velocity (at rest)
    pub fn zero() -> Self {
        Velocity::new(0.0, 0.0)
    }

    /// Get the x component
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Get the y component
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Check if both components are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }

    /// Calculate the magnitude (speed) of the velocity vector
    pub fn magnitude(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Velocity::zero()
    }
}

/// 2D acceleration in meters per second squared
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Acceleration {
    ax: f64,
    ay: f64,
}

impl Acceleration {
    /// Create a new acceleration with the given components
    pub fn new(ax: f64, ay: f64) -> Self {
        Acceleration { ax, ay }
    }

    /// Create a zero acceleration
    pub fn zero() -> Self {
        Acceleration::new(0.0, 0.0)
    }

    /// Acceleration produced by `force` acting on `mass` (a = F/m)
    pub fn from_force(force: &Force, mass: &Mass) -> Self {
        Acceleration::new(force.fx / mass.value(), force.fy / mass.value())
    }

    /// Get the x component
    pub fn ax(&self) -> f64 {
        self.ax
    }

    /// Get the y component
    pub fn ay(&self) -> f64 {
        self.ay
    }

    /// Check if both components are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.ax.is_finite() && self.ay.is_finite()
    }
}

impl Default for Acceleration {
    fn default() -> Self {
        Acceleration::zero()
    }
}

/// 2D force vector in Newtons
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Force {
    /// X component of the force in Newtons
    pub fx: f64,
    /// Y component of the force in Newtons
    pub fy: f64,
}

impl Force {
    /// Create a new force vector
    pub fn new(fx: f64, fy: f64) -> Self {
        Force { fx, fy }
    }

    /// Create a zero force
    pub fn zero() -> Self {
        Force::new(0.0, 0.0)
    }

    /// Check if the force is valid (all components finite)
    pub fn is_valid(&self) -> bool {
        self.fx.is_finite() && self.fy.is_finite()
    }

    /// Get the magnitude of the force
    pub fn magnitude(&self) -> f64 {
        (self.fx * self.fx + self.fy * self.fy).sqrt()
    }
}

impl Add for Force {
    type Output = Force;

    fn add(self, rhs: Force) -> Force {
        Force::new(self.fx + rhs.fx, self.fy + rhs.fy)
    }
}

impl AddAssign for Force {
    fn add_assign(&mut self, rhs: Force) {
        self.fx += rhs.fx;
        self.fy += rhs.fy;
    }
}

impl Sub for Force {
    type Output = Force;

    fn sub(self, rhs: Force) -> Force {
        Force::new(self.fx - rhs.fx, self.fy - rhs.fy)
    }
}

impl Neg for Force {
    type Output = Force;

    fn neg(self) -> Force {
        Force::new(-self.fx, -self.fy)
    }
}

/// Mass in kilograms
///
/// Gravitating bodies must have strictly positive, finite mass. There is no
/// immovable or massless body in this engine: a zero mass would make the
/// acceleration `F/m` undefined.
///
/// # Examples
///
/// ```
/// use nbody_engine::body::Mass;
///
/// let mass = Mass::new(5.972e24);
/// assert!(mass.value() > 0.0);
/// assert!(Mass::try_new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Mass {
    value: f64,
}

impl Mass {
    /// Create a new mass
    ///
    /// # Panics
    ///
    /// Panics if the mass is not positive and finite. For fallible
    /// construction, use `try_new`.
    pub fn new(value: f64) -> Self {
        assert!(value > 0.0 && value.is_finite(), "Mass must be positive and finite");
        Mass { value }
    }

    /// Try to create a new mass, rejecting zero, negative and non-finite values
    pub fn try_new(value: f64) -> Result<Self> {
        if value > 0.0 && value.is_finite() {
            Ok(Mass { value })
        } else {
            Err(PhysicsError::InvalidMass(value))
        }
    }

    /// Get the mass value
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl TryFrom<f64> for Mass {
    type Error = PhysicsError;

    fn try_from(value: f64) -> Result<Self> {
        Mass::try_new(value)
    }
}

impl From<Mass> for f64 {
    fn from(mass: Mass) -> f64 {
        mass.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(1.0, 2.0);
        assert_eq!(pos.x(), 1.0);
        assert_eq!(pos.y(), 2.0);
        assert_eq!(Position::default(), Position::zero());
    }

    #[test]
    fn test_position_validation() {
        assert!(Position::new(1.0, 2.0).is_valid());
        assert!(!Position::new(f64::NAN, 2.0).is_valid());
        assert!(!Position::new(1.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn test_velocity_magnitude() {
        let vel = Velocity::new(3.0, 4.0);
        assert_eq!(vel.magnitude(), 5.0);
        assert!(!Velocity::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_acceleration_from_force() {
        let acc = Acceleration::from_force(&Force::new(10.0, -4.0), &Mass::new(2.0));
        assert_eq!(acc.ax(), 5.0);
        assert_eq!(acc.ay(), -2.0);
    }

    #[test]
    fn test_force_arithmetic() {
        let mut f = Force::new(1.0, 2.0);
        f += Force::new(0.5, -1.0);
        assert_eq!(f, Force::new(1.5, 1.0));
        assert_eq!(-f, Force::new(-1.5, -1.0));
        assert_eq!(f - f, Force::zero());
        assert_eq!(Force::new(3.0, 4.0).magnitude(), 5.0);
    }

    #[test]
    fn test_mass_try_new() {
        assert_eq!(Mass::try_new(10.5).map(|m| m.value()), Ok(10.5));
        assert_eq!(Mass::try_new(0.0), Err(PhysicsError::InvalidMass(0.0)));
        assert!(Mass::try_new(-1.0).is_err());
        assert!(Mass::try_new(f64::NAN).is_err());
        assert!(Mass::try_new(f64::INFINITY).is_err());
    }

    #[test]
    #[should_panic(expected = "Mass must be positive and finite")]
    fn test_mass_zero_panics() {
        Mass::new(0.0);
    }
}
