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

//! Cooperative, frame-stepped actors.
//!
//! An [`Actor`] is a stateful task that advances one step each frame and
//! yields control back to the scheduler, optionally adjusting the time
//! budget handed to whoever runs after it. Actors run strictly one at a
//! time on the scene's thread; there is no preemption.

mod scheduler;

pub use scheduler::ActorScheduler;
pub(crate) use scheduler::run_chain;

use std::fmt;

/// A stable, human-readable identity for a registered actor.
///
/// Used for deregistration and carried in failure reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorId(String);

impl ActorId {
    /// Creates an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What an actor hands back to the scheduler after one step.
///
/// Both variants carry the delta-time the actor wants to pass on, which
/// lets an actor rescale or clamp the frame budget for everything that
/// runs after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorYield {
    /// The step is finished; resume this actor again next frame.
    Done {
        /// Delta-time forwarded to the next actor in this frame's chain.
        dt: f32,
    },
    /// Resume this same actor again immediately, within the same frame.
    Rerun {
        /// Delta-time handed back to this actor on the immediate re-entry.
        dt: f32,
    },
}

/// A cooperative task stepped once per frame by the scene.
///
/// `resume` receives the delta-time propagated from the previous actor in
/// the frame's chain (or the frame's own dt for the first actor) and must
/// return promptly; a long-running actor starves every actor behind it.
pub trait Actor {
    /// Advances the actor by one step.
    fn resume(&mut self, dt: f32) -> anyhow::Result<ActorYield>;
}
