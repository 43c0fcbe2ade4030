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
//! Body storage
//!
//! The store owns all bodies in insertion order and hands out stable
//! [`BodyId`] handles. Handles increase monotonically and are never reused,
//! so the backing vector stays sorted by handle and lookups are a binary
//! search.

use super::id::BodyId;
use super::state::{BasicBody, Body, BodyDescriptor};
use crate::error::{PhysicsError, Result};

/// Ordered collection of bodies
#[derive(Debug, Clone, Default)]
pub struct BodyStore {
    next_id: u64,
    bodies: Vec<Body>,
}

impl BodyStore {
    /// Create an empty store
    pub fn new() -> Self {
        BodyStore {
            next_id: 0,
            bodies: Vec::new(),
        }
    }

    /// Create an empty store with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        BodyStore {
            next_id: 0,
            bodies: Vec::with_capacity(capacity),
        }
    }

    /// Validate a descriptor and add the body, returning its new handle
    ///
    /// A rejected descriptor does not consume a handle.
    pub fn add(&mut self, descriptor: BodyDescriptor) -> Result<BodyId> {
        let id = BodyId::new(self.next_id);
        let body = Body::from_descriptor(id, descriptor)?;
        self.next_id += 1;
        self.bodies.push(body);
        Ok(id)
    }

    /// Remove a body, preserving the order of the remaining ones
    pub fn remove(&mut self, id: BodyId) -> Result<Body> {
        let index = self.index_of(id).ok_or(PhysicsError::UnknownBody(id))?;
        Ok(self.bodies.remove(index))
    }

    /// Position of a handle in iteration order
    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id()).ok()
    }

    /// Look up a body by handle
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    /// Check whether a handle is present
    pub fn contains(&self, id: BodyId) -> bool {
        self.index_of(id).is_some()
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the store holds no bodies
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// All bodies in insertion order
    pub fn as_slice(&self) -> &[Body] {
        &self.bodies
    }

    /// Iterate over bodies in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Iterate mutably over bodies in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    /// Refill `out` with the mass/position projection of every body
    pub fn project_into(&self, out: &mut Vec<BasicBody>) {
        out.clear();
        out.extend(self.bodies.iter().map(Body::basic));
    }

    /// Remove all bodies; handle numbering continues where it left off
    pub fn clear(&mut self) {
        self.bodies.clear();
    }
}
