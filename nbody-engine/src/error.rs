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
//! Error types for the N-body engine
//!
//! Invalid input is rejected at construction time (masses, initial state,
//! configuration). Failures during a tick are reported through the same
//! [`PhysicsError`] so callers can stop a run cleanly.

use crate::body::BodyId;
use std::fmt;

/// Errors produced by body construction, configuration and simulation steps
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass was zero, negative, NaN or infinite
    InvalidMass(f64),
    /// An initial state vector had a non-finite component
    InvalidState {
        /// Name of the offending field
        field: &'static str,
    },
    /// A configuration value is outside its valid domain
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// Human readable constraint that was violated
        reason: String,
    },
    /// A body was inserted into a tree node that does not contain it
    OutOfBounds {
        /// Handle of the rejected body
        body: BodyId,
        /// X coordinate of the body
        x: f64,
        /// Y coordinate of the body
        y: f64,
    },
    /// A body's position is NaN or infinite, so no enclosing box exists
    NonFinitePosition {
        /// Handle of the offending body
        body: BodyId,
    },
    /// No body with this handle is present in the store
    UnknownBody(BodyId),
    /// The requested strategy is a declared extension point without an implementation
    Unimplemented(&'static str),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass(m) => {
                write!(f, "invalid mass {m}: mass must be positive and finite")
            }
            PhysicsError::InvalidState { field } => {
                write!(f, "invalid initial {field}: all components must be finite")
            }
            PhysicsError::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration for `{field}`: {reason}")
            }
            PhysicsError::OutOfBounds { body, x, y } => {
                write!(f, "{body} at ({x:e}, {y:e}) lies outside the tree boundary")
            }
            PhysicsError::NonFinitePosition { body } => {
                write!(f, "{body} has a non-finite position")
            }
            PhysicsError::UnknownBody(body) => write!(f, "{body} is not in the body store"),
            PhysicsError::Unimplemented(what) => write!(f, "{what} is not implemented"),
        }
    }
}

impl std::error::Error for PhysicsError {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PhysicsError>;
