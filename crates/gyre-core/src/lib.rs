// Copyright 2025 eraflo
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

//! # Gyre Core
//!
//! Foundational scene kernel combining a hierarchical, namespace-based event
//! dispatch engine with a cooperative, frame-stepped actor scheduler.
//!
//! A [`Scene`] is driven once per frame by a host loop via [`Scene::tick`].
//! Each tick drains queued events through the subscriber registry (handlers
//! may enqueue more events mid-drain and still see them delivered the same
//! frame), then resumes every registered [`actor::Actor`] with the frame's
//! time delta, threading the remaining delta from one actor into the next.

#![warn(missing_docs)]

pub mod actor;
pub mod error;
pub mod event;
pub mod scene;

pub use actor::{Actor, ActorId, ActorYield};
pub use error::SceneError;
pub use event::{handler, Event, Handled, Handler, HandlerArgs};
pub use scene::{Scene, TickStatus, FRAME_UPDATE_NAMESPACE};
