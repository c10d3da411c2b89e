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

//! Registration-ordered actor scheduling.

use crate::actor::{Actor, ActorId, ActorYield};
use crate::error::SceneError;
use std::cell::RefCell;
use std::rc::Rc;

/// One scheduled actor with its identity.
#[derive(Clone)]
pub(crate) struct ActorEntry {
    pub(crate) id: ActorId,
    pub(crate) actor: Rc<RefCell<dyn Actor>>,
}

/// Holds the scene's actors and resumes them once per frame.
///
/// Actors run in registration order. The delta-time each actor returns is
/// what the next actor receives, so an actor early in the order can slow
/// down or pause everything behind it.
#[derive(Default)]
pub struct ActorScheduler {
    actors: Vec<ActorEntry>,
}

impl ActorScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an actor at the end of the resume order.
    pub fn register(&mut self, id: impl Into<ActorId>, actor: Rc<RefCell<dyn Actor>>) {
        let id = id.into();
        log::info!("ActorScheduler: registered actor '{id}'");
        self.actors.push(ActorEntry { id, actor });
    }

    /// Removes an actor by id. Returns `false` when no such actor exists.
    /// The slot it occupied closes up; relative order of the rest is kept.
    pub fn deregister(&mut self, id: &ActorId) -> bool {
        let before = self.actors.len();
        self.actors.retain(|entry| entry.id != *id);
        let removed = self.actors.len() != before;
        if removed {
            log::info!("ActorScheduler: deregistered actor '{id}'");
        } else {
            log::warn!("ActorScheduler: no actor '{id}' to deregister");
        }
        removed
    }

    /// Number of registered actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether no actors are registered.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Resumes every actor once, threading delta-time along the chain.
    /// Returns the dt yielded by the last actor (or `dt` unchanged when
    /// no actors are registered).
    pub fn resume_all(&self, dt: f32) -> Result<f32, SceneError> {
        run_chain(&self.snapshot(), dt)
    }

    /// An owned copy of the current resume order. Registering or
    /// deregistering while a chain runs affects the next frame only.
    pub(crate) fn snapshot(&self) -> Vec<ActorEntry> {
        self.actors.clone()
    }
}

/// Runs one frame's resume chain over a snapshot of actors.
///
/// Each actor is resumed with the dt yielded by its predecessor; a
/// [`ActorYield::Rerun`] re-enters the same actor immediately with the dt
/// it just returned. An actor error stops the chain.
pub(crate) fn run_chain(entries: &[ActorEntry], dt: f32) -> Result<f32, SceneError> {
    let mut carried = dt;
    for entry in entries {
        loop {
            let step = entry
                .actor
                .borrow_mut()
                .resume(carried)
                .map_err(|err| SceneError::actor(entry.id.clone(), err))?;
            match step {
                ActorYield::Done { dt } => {
                    carried = dt;
                    break;
                }
                ActorYield::Rerun { dt } => {
                    log::trace!("ActorScheduler: '{}' requested immediate rerun", entry.id);
                    carried = dt;
                }
            }
        }
    }
    Ok(carried)
}
