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

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// An immutable bag of named fields carried by one event.
///
/// Producers build an event with [`Event::with`], dispatch reads fields to
/// satisfy handler argument bindings, and the payload is discarded once the
/// dispatch pass completes. The routing event-type string is *not* part of
/// the payload; it travels beside it as `(event_type, Event)`.
///
/// ```rust
/// use gyre_core::Event;
///
/// let collision = Event::new().with("ball", 3).with("paddle", "left");
/// assert_eq!(collision.get("paddle").and_then(|v| v.as_str()), Some("left"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    fields: BTreeMap<String, Value>,
}

impl Event {
    /// Creates an event with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the event with `name` set to `value`, replacing any previous
    /// value under that name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns the value of the named field, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns `true` if the event carries the named field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the event carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, value)` pairs in field-name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
