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

//! Double-buffered FIFO of `(event_type, Event)` pairs.

use crate::event::payload::Event;
use std::cell::RefCell;
use std::rc::Rc;

/// Double-buffered event queue.
///
/// `current` holds the events being drained this pass; `pending` accumulates
/// events queued *while* a drain is in progress. The drain protocol never
/// mutates the batch it is iterating: it takes `current` wholesale, and once
/// that batch is dispatched swaps `pending` in as the new `current`,
/// repeating until both buffers are empty. An event queued by a handler
/// mid-drain is therefore delivered before the drain ends, exactly once.
#[derive(Debug, Default)]
pub struct EventQueue {
    current: Vec<(String, Event)>,
    pending: Vec<(String, Event)>,
    draining: bool,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event. Routed to the pending buffer while a drain is in
    /// progress, otherwise straight to the current buffer.
    pub fn queue(&mut self, event_type: impl Into<String>, event: Event) {
        let event_type = event_type.into();
        log::trace!("EventQueue: queued '{event_type}' (draining={})", self.draining);
        if self.draining {
            self.pending.push((event_type, event));
        } else {
            self.current.push((event_type, event));
        }
    }

    /// Returns `true` while a drain pass is in progress.
    pub fn is_draining(&self) -> bool {
        self.draining
    }

    /// Total undelivered events across both buffers.
    pub fn len(&self) -> usize {
        self.current.len() + self.pending.len()
    }

    /// Returns `true` if neither buffer holds events.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.pending.is_empty()
    }

    /// Marks a drain pass as started so that new events route to `pending`.
    /// Returns `false` if a drain is already in progress (nested drain
    /// requests are no-ops).
    pub(crate) fn begin_drain(&mut self) -> bool {
        if self.draining {
            return false;
        }
        self.draining = true;
        true
    }

    /// Takes the next batch to dispatch, promoting `pending` to `current`
    /// when the current batch is exhausted. An empty result means the drain
    /// is complete.
    pub(crate) fn next_batch(&mut self) -> Vec<(String, Event)> {
        if self.current.is_empty() {
            std::mem::swap(&mut self.current, &mut self.pending);
        }
        std::mem::take(&mut self.current)
    }

    /// Marks the drain pass as finished.
    pub(crate) fn end_drain(&mut self) {
        self.draining = false;
    }
}

/// Cheaply cloneable handle for queueing events onto a scene's queue.
///
/// Handlers and actors capture one of these at setup time (the scene is
/// single-threaded, so this is a plain `Rc`); queueing mid-drain routes to
/// the pending buffer and is delivered before the drain completes.
#[derive(Debug, Clone)]
pub struct QueueHandle {
    inner: Rc<RefCell<EventQueue>>,
}

impl QueueHandle {
    pub(crate) fn new(inner: Rc<RefCell<EventQueue>>) -> Self {
        Self { inner }
    }

    /// Queues an event for delivery on the owning scene.
    pub fn queue(&self, event_type: impl Into<String>, event: Event) {
        self.inner.borrow_mut().queue(event_type, event);
    }
}
