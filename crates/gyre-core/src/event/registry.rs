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

//! Namespace registry: per-namespace ordered subscription lists.

use crate::event::handler::{Binding, HandlerRef};
use std::collections::HashMap;

/// One registered subscription.
#[derive(Debug, Clone)]
pub struct Entry {
    handler: HandlerRef,
    binding: Binding,
    priority: i32,
    seq: u64,
}

impl Entry {
    /// The handler reference as it was registered.
    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// The argument binding shared by every invocation of this entry.
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// The dispatch priority. Lower values run first; ties preserve
    /// registration order.
    pub fn priority(&self) -> i32 {
        self.priority
    }
}

/// Stores, per dotted namespace, the ordered list of subscription entries,
/// and resolves which entries apply to an incoming event type.
///
/// A namespace matches its own event type and every dotted descendant:
/// `"input.mouse"` receives `"input.mouse"` and `"input.mouse.down"`, but
/// not `"input.mousewheel"`. Lookups return entries from *every* matching
/// prefix depth, since subscribers at different depths are all eligible.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    namespaces: HashMap<String, Vec<Entry>>,
    next_seq: u64,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one handler under `namespace`.
    ///
    /// A trailing `".*"` wildcard suffix is trimmed before storing, so
    /// `"input.*"` and `"input"` subscribe identically. The namespace's
    /// entry list is kept sorted by ascending priority (lower first);
    /// equal priorities stay in registration order.
    pub fn register(
        &mut self,
        namespace: &str,
        handler: HandlerRef,
        binding: Binding,
        priority: i32,
    ) {
        self.register_multiple(namespace, vec![handler], binding, priority);
    }

    /// Registers several handlers at once, each becoming its own entry, all
    /// sharing the same namespace, binding, and priority. Their relative
    /// order is the order of `handlers`.
    pub fn register_multiple(
        &mut self,
        namespace: &str,
        handlers: Vec<HandlerRef>,
        binding: Binding,
        priority: i32,
    ) {
        let namespace = trim_wildcard(namespace);
        let list = self.namespaces.entry(namespace.to_string()).or_default();
        for handler in handlers {
            log::debug!("HandlerRegistry: registered {handler:?} under '{namespace}' (priority={priority})");
            list.push(Entry {
                handler,
                binding: binding.clone(),
                priority,
                seq: self.next_seq,
            });
            self.next_seq += 1;
        }
        // Stable: equal priorities keep their registration (seq) order.
        list.sort_by_key(|e| e.priority);
    }

    /// Removes every entry in `namespace` whose handler reference equals
    /// `handler` (identity for callables, path equality for dynamic
    /// entries). No-op if the namespace or handler is absent.
    pub fn unregister(&mut self, namespace: &str, handler: &HandlerRef) {
        let namespace = trim_wildcard(namespace);
        if let Some(list) = self.namespaces.get_mut(namespace) {
            list.retain(|e| e.handler != *handler);
        }
    }

    /// Removes all entries from `namespace` and from every registered
    /// descendant namespace. No-op on unknown namespaces.
    pub fn clear_namespace(&mut self, namespace: &str) {
        let namespace = trim_wildcard(namespace);
        self.namespaces
            .retain(|registered, _| !namespace_matches(namespace, registered));
    }

    /// Every registered namespace that is a dotted prefix of `event_type`.
    /// Order is unspecified; [`entries_for`](Self::entries_for) imposes the
    /// dispatch order.
    pub fn matching_namespaces(&self, event_type: &str) -> Vec<&str> {
        self.namespaces
            .keys()
            .filter(|ns| namespace_matches(ns, event_type))
            .map(String::as_str)
            .collect()
    }

    /// The number of entries registered under exactly `namespace`.
    pub fn namespace_len(&self, namespace: &str) -> usize {
        self.namespaces
            .get(trim_wildcard(namespace))
            .map_or(0, Vec::len)
    }

    /// Snapshot of every entry applicable to `event_type`, across all
    /// matching namespace depths, sorted by ascending priority (lower
    /// first) with ties in global registration order.
    ///
    /// Dispatch iterates this owned snapshot, so handlers that register or
    /// unregister mid-pass cannot corrupt the iteration; their changes take
    /// effect from the next pass.
    pub fn entries_for(&self, event_type: &str) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .namespaces
            .iter()
            .filter(|(ns, _)| namespace_matches(ns, event_type))
            .flat_map(|(_, list)| list.iter().cloned())
            .collect();
        entries.sort_by_key(|e| (e.priority, e.seq));
        entries
    }
}

/// Trims one trailing `".*"` wildcard suffix.
fn trim_wildcard(namespace: &str) -> &str {
    namespace.strip_suffix(".*").unwrap_or(namespace)
}

/// Dotted-prefix match: `namespace` receives `event_type` when equal, or
/// when `event_type` continues past `namespace` at a `.` boundary. The
/// empty namespace (from a bare `".*"` registration) matches everything.
fn namespace_matches(namespace: &str, event_type: &str) -> bool {
    if namespace.is_empty() {
        return true;
    }
    event_type == namespace
        || (event_type.len() > namespace.len()
            && event_type.starts_with(namespace)
            && event_type.as_bytes()[namespace.len()] == b'.')
}
