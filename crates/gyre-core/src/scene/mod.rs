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

//! The scene: one frame-stepped world tying events and actors together.

use crate::actor::{run_chain, Actor, ActorId, ActorScheduler};
use crate::error::SceneError;
use crate::event::{
    handler, Binding, Dispatcher, Event, EventQueue, EventSource, Handled, Handler,
    HandlerRef, HandlerRegistry, HandlerTable, QueueHandle, SourcePump,
};
use std::cell::RefCell;
use std::rc::Rc;

/// The namespace the per-frame update event is dispatched under.
///
/// The scene's built-in drain and actor-resume handlers subscribe here at
/// priority 0; user handlers registered on this namespace with a negative
/// priority run before either built-in, with a positive priority after both.
pub const FRAME_UPDATE_NAMESPACE: &str = "director.update";

/// Whether the scene's event source can still produce events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Frame completed normally; keep ticking.
    Running,
    /// The event source is exhausted; the driving loop should stop.
    SourceExhausted,
}

/// A self-contained world of event handlers and cooperative actors,
/// advanced one frame at a time by [`Scene::tick`].
///
/// Everything inside a scene runs on the thread that ticks it. The only
/// cross-thread surface is an optional [`EventSource`] such as
/// [`ChannelSource`](crate::event::ChannelSource), pumped at the top of
/// every frame.
pub struct Scene {
    registry: Rc<RefCell<HandlerRegistry>>,
    table: Rc<RefCell<HandlerTable>>,
    queue: Rc<RefCell<EventQueue>>,
    scheduler: Rc<RefCell<ActorScheduler>>,
    dispatcher: Dispatcher,
    source: Option<Box<dyn EventSource>>,
}

impl Scene {
    /// Creates a scene with its built-in frame pipeline installed.
    ///
    /// Two handlers are registered under [`FRAME_UPDATE_NAMESPACE`] at
    /// priority 0, in this order: drain the event queue, then resume every
    /// actor (threading the frame's `dt` field down the chain).
    pub fn new() -> Self {
        let registry = Rc::new(RefCell::new(HandlerRegistry::new()));
        let table = Rc::new(RefCell::new(HandlerTable::new()));
        let queue = Rc::new(RefCell::new(EventQueue::new()));
        let scheduler = Rc::new(RefCell::new(ActorScheduler::new()));
        let dispatcher = Dispatcher::new(Rc::clone(&registry), Rc::clone(&table));

        let drain = {
            let dispatcher = dispatcher.clone();
            let queue = Rc::clone(&queue);
            handler(move |_| {
                dispatcher.drain(&queue)?;
                Ok(Handled::Pass)
            })
        };
        let run_actors = {
            let scheduler = Rc::clone(&scheduler);
            handler(move |args| {
                let dt = args.as_f64(0).unwrap_or(0.0) as f32;
                // Snapshot first so actors may register or deregister
                // actors without a borrow collision.
                let entries = scheduler.borrow().snapshot();
                run_chain(&entries, dt)?;
                Ok(Handled::Pass)
            })
        };
        {
            let mut registry = registry.borrow_mut();
            registry.register(
                FRAME_UPDATE_NAMESPACE,
                HandlerRef::Callable(drain),
                Binding::new(),
                0,
            );
            registry.register(
                FRAME_UPDATE_NAMESPACE,
                HandlerRef::Callable(run_actors),
                Binding::new().arg("dt"),
                0,
            );
        }

        log::info!("Scene: initialized");
        Self {
            registry,
            table,
            queue,
            scheduler,
            dispatcher,
            source: None,
        }
    }

    /// Advances the scene by one frame.
    ///
    /// Pumps the event source (if any), queues whatever it produced, then
    /// dispatches the frame update event carrying `dt` in seconds. Returns
    /// [`TickStatus::SourceExhausted`] without running the frame once the
    /// source reports it will never produce again.
    pub fn tick(&mut self, dt: f32) -> Result<TickStatus, SceneError> {
        if let Some(source) = self.source.as_mut() {
            match source.pump() {
                SourcePump::Events(batch) => {
                    let mut queue = self.queue.borrow_mut();
                    for (event_type, event) in batch {
                        queue.queue(event_type, event);
                    }
                }
                SourcePump::Exhausted => {
                    log::info!("Scene: event source exhausted, stopping");
                    return Ok(TickStatus::SourceExhausted);
                }
            }
        }
        self.handle(FRAME_UPDATE_NAMESPACE, &Event::new().with("dt", dt as f64))?;
        Ok(TickStatus::Running)
    }

    /// Dispatches an event synchronously, bypassing the queue.
    pub fn handle(&self, event_type: &str, event: &Event) -> Result<(), SceneError> {
        self.dispatcher.dispatch(event_type, event)
    }

    /// Queues an event for delivery during the next drain.
    pub fn queue(&self, event_type: impl Into<String>, event: Event) {
        self.queue.borrow_mut().queue(event_type, event);
    }

    /// A cloneable handle for queueing events from handlers and actors.
    pub fn queue_handle(&self) -> QueueHandle {
        QueueHandle::new(Rc::clone(&self.queue))
    }

    /// Drains the event queue immediately instead of waiting for the next
    /// frame. A no-op when called from inside a handler already draining.
    pub fn drain(&self) -> Result<(), SceneError> {
        self.dispatcher.drain(&self.queue)
    }

    /// Registers a handler under a namespace with no argument binding, at
    /// priority 0.
    pub fn register(&self, namespace: &str, handler: Handler) {
        self.register_with(namespace, handler, Binding::new(), 0);
    }

    /// Registers a handler with an explicit argument binding and priority.
    /// Lower priority values are invoked first; ties run in registration
    /// order.
    pub fn register_with(&self, namespace: &str, handler: Handler, binding: Binding, priority: i32) {
        self.registry
            .borrow_mut()
            .register(namespace, HandlerRef::Callable(handler), binding, priority);
    }

    /// Registers several handlers under one namespace in a single call,
    /// sharing a binding and priority, ordered as given.
    pub fn register_multiple(
        &self,
        namespace: &str,
        handlers: Vec<Handler>,
        binding: Binding,
        priority: i32,
    ) {
        self.registry.borrow_mut().register_multiple(
            namespace,
            handlers.into_iter().map(HandlerRef::Callable).collect(),
            binding,
            priority,
        );
    }

    /// Registers several dynamic paths under one namespace in a single call,
    /// sharing a binding and priority, ordered as given.
    pub fn register_multiple_dynamic(
        &self,
        namespace: &str,
        paths: Vec<String>,
        binding: Binding,
        priority: i32,
    ) {
        self.registry.borrow_mut().register_multiple(
            namespace,
            paths.into_iter().map(HandlerRef::Dynamic).collect(),
            binding,
            priority,
        );
    }

    /// Registers a dynamic entry: the handler is looked up by `path` in
    /// the scene's named-handler table at dispatch time, so rebinding the
    /// path retargets the entry without re-registering.
    pub fn register_dynamic(&self, namespace: &str, path: impl Into<String>) {
        self.register_dynamic_with(namespace, path, Binding::new(), 0);
    }

    /// Registers a dynamic entry with an explicit binding and priority.
    pub fn register_dynamic_with(
        &self,
        namespace: &str,
        path: impl Into<String>,
        binding: Binding,
        priority: i32,
    ) {
        self.registry.borrow_mut().register(
            namespace,
            HandlerRef::Dynamic(path.into()),
            binding,
            priority,
        );
    }

    /// Removes every entry for this handler in `namespace` (identity
    /// comparison). Entries under other namespaces are untouched.
    pub fn unregister(&self, namespace: &str, handler: &Handler) {
        self.registry
            .borrow_mut()
            .unregister(namespace, &HandlerRef::Callable(handler.clone()));
    }

    /// Removes every dynamic entry for `path` in `namespace`.
    pub fn unregister_dynamic(&self, namespace: &str, path: &str) {
        self.registry
            .borrow_mut()
            .unregister(namespace, &HandlerRef::Dynamic(path.to_string()));
    }

    /// Drops all entries registered under `namespace` and every descendant
    /// namespace.
    pub fn clear_namespace(&self, namespace: &str) {
        self.registry.borrow_mut().clear_namespace(namespace);
    }

    /// Binds a named handler path in the scene's table, returning the
    /// previously bound handler if any.
    pub fn bind(&self, path: impl Into<String>, handler: Handler) -> Option<Handler> {
        self.table.borrow_mut().bind(path, handler)
    }

    /// Removes a named handler path from the table. Dynamic entries
    /// registered against it are skipped until it is rebound.
    pub fn unbind(&self, path: &str) -> Option<Handler> {
        self.table.borrow_mut().unbind(path)
    }

    /// Adds an actor at the end of the per-frame resume order.
    pub fn register_actor(&self, id: impl Into<ActorId>, actor: Rc<RefCell<dyn Actor>>) {
        self.scheduler.borrow_mut().register(id, actor);
    }

    /// Removes an actor by id. Returns `false` when no such actor exists.
    pub fn deregister_actor(&self, id: &ActorId) -> bool {
        self.scheduler.borrow_mut().deregister(id)
    }

    /// Number of registered actors.
    pub fn actor_count(&self) -> usize {
        self.scheduler.borrow().len()
    }

    /// Installs the external event feed pumped at the top of every tick,
    /// replacing any previous source.
    pub fn set_event_source(&mut self, source: Box<dyn EventSource>) {
        self.source = Some(source);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_without_source_keeps_running() {
        let mut scene = Scene::new();
        assert_eq!(scene.tick(0.016).unwrap(), TickStatus::Running);
    }

    #[test]
    fn frame_update_carries_dt_to_subscribers() {
        let mut scene = Scene::new();
        let seen = Rc::new(RefCell::new(None));
        let probe = {
            let seen = Rc::clone(&seen);
            handler(move |args| {
                *seen.borrow_mut() = args.as_f64(0);
                Ok(Handled::Pass)
            })
        };
        scene.register_with(
            FRAME_UPDATE_NAMESPACE,
            probe,
            Binding::new().arg("dt"),
            1,
        );

        scene.tick(0.25).unwrap();
        assert_eq!(*seen.borrow(), Some(0.25));
    }
}
