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
//! Body store and per-body physical state
//!
//! - [`BodyId`]: stable handle, never reused
//! - [`Position`], [`Velocity`], [`Acceleration`], [`Force`], [`Mass`]: 2D state components
//! - [`Body`]: full per-body state including the bounded trail
//! - [`BasicBody`]: mass/position projection consumed by the force engines
//! - [`BodyStore`]: insertion-ordered collection

mod components;
mod id;
mod state;
mod store;

pub use components::{Acceleration, Force, Mass, Position, Velocity};
pub use id::BodyId;
pub use state::{BasicBody, Body, BodyDescriptor, IntegrationState, RenderAttributes, Rgb};
pub use store::BodyStore;
