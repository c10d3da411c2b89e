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

//! Handler references, argument binding, and the named-handler table.

use crate::error::SceneError;
use crate::event::payload::Event;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Outcome of a single handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The handler claimed the event; remaining entries are skipped.
    Consumed,
    /// The event continues to lower-precedence entries.
    Pass,
}

/// Result of a handler invocation. An `Err` aborts the dispatch pass and
/// propagates to the host; locally recoverable problems should instead
/// return [`Handled::Pass`].
pub type HandlerResult = Result<Handled, SceneError>;

/// A subscribed callable.
///
/// Handlers are shared, not owned: the registry keeps a clone of the `Rc`
/// and [`unregister`](crate::event::HandlerRegistry::unregister) compares by
/// identity against the clone the caller kept. Interior state belongs in the
/// closure's captures (`Rc<RefCell<..>>` for anything mutable); the scene is
/// single-threaded, so no locking is involved.
pub type Handler = Rc<dyn Fn(&HandlerArgs) -> HandlerResult>;

/// Wraps a closure as a [`Handler`].
///
/// ```rust
/// use gyre_core::{handler, Handled};
///
/// let on_score = handler(|_args| Ok(Handled::Consumed));
/// ```
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&HandlerArgs) -> HandlerResult + 'static,
{
    Rc::new(f)
}

/// What the registry stores for one subscription: either a callable, or a
/// dotted path resolved against the scene's [`HandlerTable`] at dispatch
/// time. The dynamic form supports handlers that do not exist yet at
/// registration time, or whose target varies.
///
/// Equality is identity for callables (`Rc::ptr_eq`) and string equality for
/// dynamic paths — the *original* reference, never the resolved target.
#[derive(Clone)]
pub enum HandlerRef {
    /// A directly registered callable.
    Callable(Handler),
    /// A dotted path looked up in the scene's named-handler table.
    Dynamic(String),
}

impl PartialEq for HandlerRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Callable(a), Self::Callable(b)) => Rc::ptr_eq(a, b),
            (Self::Dynamic(a), Self::Dynamic(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(h) => write!(f, "Callable({:p})", Rc::as_ptr(h)),
            Self::Dynamic(path) => write!(f, "Dynamic({path:?})"),
        }
    }
}

/// Declares which event fields a handler receives, and under what shape.
///
/// Positional names are read off the event in order; keyword pairs map a
/// handler-side keyword to an event field name. A binding with a name the
/// event does not carry makes that one invocation skip (logged, non-fatal).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding {
    positional: Vec<String>,
    keyword: Vec<(String, String)>,
}

impl Binding {
    /// Creates an empty binding (the handler receives no arguments).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positionally bound event field name.
    pub fn arg(mut self, attr: impl Into<String>) -> Self {
        self.positional.push(attr.into());
        self
    }

    /// Appends a keyword binding: the handler sees `keyword`, filled from the
    /// event field `attr`.
    pub fn kwarg(mut self, keyword: impl Into<String>, attr: impl Into<String>) -> Self {
        self.keyword.push((keyword.into(), attr.into()));
        self
    }

    /// Resolves the binding against an event. `Err` names the first missing
    /// field.
    pub(crate) fn resolve(&self, event: &Event) -> Result<HandlerArgs, String> {
        let mut positional = Vec::with_capacity(self.positional.len());
        for attr in &self.positional {
            match event.get(attr) {
                Some(value) => positional.push(value.clone()),
                None => return Err(attr.clone()),
            }
        }
        let mut keyword = HashMap::with_capacity(self.keyword.len());
        for (kw, attr) in &self.keyword {
            match event.get(attr) {
                Some(value) => keyword.insert(kw.clone(), value.clone()),
                None => return Err(attr.clone()),
            };
        }
        Ok(HandlerArgs { positional, keyword })
    }
}

/// The arguments a handler was invoked with, resolved from an event's fields
/// according to the entry's [`Binding`].
#[derive(Debug, Clone, Default)]
pub struct HandlerArgs {
    positional: Vec<Value>,
    keyword: HashMap<String, Value>,
}

impl HandlerArgs {
    /// All positionally bound values, in binding order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// The positional value at `index`, if bound.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// The positional value at `index` as an `f64`, if bound and numeric.
    pub fn as_f64(&self, index: usize) -> Option<f64> {
        self.positional.get(index).and_then(Value::as_f64)
    }

    /// The keyword value under `name`, if bound.
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }
}

/// Explicit registry of named handlers backing [`HandlerRef::Dynamic`].
///
/// Dotted paths are ordinary string keys populated at scene-setup time via
/// [`bind`](Self::bind); dispatch performs a plain lookup, so late binding
/// needs no reflection. A path with no entry resolves to "no handler" and
/// the dispatching entry is skipped silently.
#[derive(Default)]
pub struct HandlerTable {
    entries: HashMap<String, Handler>,
}

impl HandlerTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `path` to `handler`, returning the previously bound handler if
    /// any. Rebinding takes effect on the next dispatch pass.
    pub fn bind(&mut self, path: impl Into<String>, handler: Handler) -> Option<Handler> {
        self.entries.insert(path.into(), handler)
    }

    /// Removes the binding for `path`, returning it if present.
    pub fn unbind(&mut self, path: &str) -> Option<Handler> {
        self.entries.remove(path)
    }

    /// Looks up the handler bound to `path`.
    pub fn resolve(&self, path: &str) -> Option<Handler> {
        self.entries.get(path).cloned()
    }

    /// Returns the number of bound names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no names are bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
