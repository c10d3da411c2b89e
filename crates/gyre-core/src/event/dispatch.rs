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

//! Priority-ordered, re-entrant-safe event delivery.

use crate::error::SceneError;
use crate::event::handler::{Handled, HandlerRef, HandlerTable};
use crate::event::payload::Event;
use crate::event::queue::EventQueue;
use crate::event::registry::HandlerRegistry;
use std::cell::RefCell;
use std::rc::Rc;

/// Resolves and invokes every subscription entry applicable to one event.
///
/// The dispatcher holds shared handles to the registry and the scene's
/// named-handler table; it is `Clone`, so built-in frame handlers capture
/// their own copy. Each dispatch iterates an owned snapshot of the matching
/// entries (taken before the first invocation), which makes registration and
/// unregistration from inside a handler safe: mutations take effect from the
/// next pass.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Rc<RefCell<HandlerRegistry>>,
    table: Rc<RefCell<HandlerTable>>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given registry and named-handler table.
    pub fn new(
        registry: Rc<RefCell<HandlerRegistry>>,
        table: Rc<RefCell<HandlerTable>>,
    ) -> Self {
        Self { registry, table }
    }

    /// Dispatches one event to every applicable entry, in ascending
    /// priority order (lower first, ties in registration order), across
    /// all matching namespace depths.
    ///
    /// Per-entry recovery:
    /// - a dynamic path with no binding in the table is skipped silently;
    /// - an entry whose argument binding names a field the event lacks is
    ///   skipped with a warning;
    /// - an entry returning [`Handled::Consumed`] stops the pass — first
    ///   handler that claims the event wins.
    ///
    /// A handler returning `Err` aborts the pass and propagates.
    pub fn dispatch(&self, event_type: &str, event: &Event) -> Result<(), SceneError> {
        let entries = self.registry.borrow().entries_for(event_type);
        log::trace!(
            "Dispatcher: '{event_type}' matched {} entr{}",
            entries.len(),
            if entries.len() == 1 { "y" } else { "ies" }
        );

        for entry in entries {
            let callable = match entry.handler() {
                HandlerRef::Callable(h) => h.clone(),
                HandlerRef::Dynamic(path) => match self.table.borrow().resolve(path) {
                    Some(h) => h,
                    None => {
                        log::trace!(
                            "Dispatcher: dynamic path '{path}' unresolved for '{event_type}', skipping"
                        );
                        continue;
                    }
                },
            };

            let args = match entry.binding().resolve(event) {
                Ok(args) => args,
                Err(missing) => {
                    log::warn!(
                        "Dispatcher: skipping a handler for '{event_type}': event lacks field '{missing}'"
                    );
                    continue;
                }
            };

            if let Handled::Consumed = (callable)(&args)? {
                log::trace!("Dispatcher: '{event_type}' consumed, short-circuiting");
                break;
            }
        }
        Ok(())
    }

    /// Fully drains a queue through this dispatcher.
    ///
    /// Repeatedly dispatches the current batch, then promotes events queued
    /// during it, until both buffers are empty — so an event queued from
    /// inside a handler is delivered before this call returns, never twice,
    /// and never in the batch currently being iterated. A nested drain
    /// request while one is already in progress is a no-op.
    pub fn drain(&self, queue: &Rc<RefCell<EventQueue>>) -> Result<(), SceneError> {
        if !queue.borrow_mut().begin_drain() {
            return Ok(());
        }
        loop {
            let batch = queue.borrow_mut().next_batch();
            if batch.is_empty() {
                break;
            }
            for (event_type, event) in &batch {
                if let Err(err) = self.dispatch(event_type, event) {
                    queue.borrow_mut().end_drain();
                    return Err(err);
                }
            }
        }
        queue.borrow_mut().end_drain();
        Ok(())
    }
}
