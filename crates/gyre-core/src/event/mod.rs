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

//! Event representation, routing, and delivery.
//!
//! Events are attribute bags ([`Event`]) routed by a dotted namespace string
//! carried beside the payload. Subscribers live in a [`HandlerRegistry`]
//! keyed by namespace, where a namespace matches its own events and every
//! descendant (`"input.mouse"` receives `"input.mouse.down"`). Queued events
//! sit in a double-buffered [`EventQueue`] and are drained through the
//! [`Dispatcher`], which snapshots the applicable entries, binds each
//! handler's arguments from the event's fields, and invokes them in priority
//! order until one consumes the event.
//!
//! The boundary to the outside world is the [`EventSource`] trait: adapters
//! (platform input translation, replay streams) hand over
//! `(event_type, Event)` pairs each frame without this module knowing how
//! they were produced.

mod dispatch;
mod handler;
mod payload;
mod queue;
mod registry;
mod source;

pub use self::dispatch::Dispatcher;
pub use self::handler::{
    handler, Binding, Handled, Handler, HandlerArgs, HandlerRef, HandlerResult, HandlerTable,
};
pub use self::payload::Event;
pub use self::queue::{EventQueue, QueueHandle};
pub use self::registry::{Entry, HandlerRegistry};
pub use self::source::{ChannelSource, EventSource, SourcePump};
