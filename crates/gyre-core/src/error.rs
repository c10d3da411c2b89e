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

//! Defines the error types surfaced by a running scene.

use crate::actor::ActorId;
use std::fmt;

/// An error raised while driving a scene frame.
///
/// Locally recoverable conditions (a handler whose argument binding cannot be
/// satisfied, a dynamic path that does not resolve) are *not* errors: they
/// skip the affected entry and are reported through the `log` facade instead.
/// What reaches this type is failure the host must see: a faulting actor task
/// body, or a handler that explicitly returned an error.
#[derive(Debug)]
pub enum SceneError {
    /// An actor task body failed during a frame resumption. The chain stops
    /// at the failing actor; later actors are not resumed that frame.
    ActorFailed {
        /// The registered identifier of the failing actor.
        id: ActorId,
        /// The underlying failure reported by the task body.
        source: anyhow::Error,
    },
    /// A subscribed handler returned an error during dispatch.
    HandlerFailed {
        /// The namespace the failing handler was registered under, or the
        /// event type it was dispatched for when the namespace is unknown.
        namespace: String,
        /// The underlying failure reported by the handler.
        source: anyhow::Error,
    },
}

impl SceneError {
    /// Wraps an arbitrary error as a handler failure for the given namespace.
    ///
    /// Convenience for handler bodies using `?` on fallible operations:
    ///
    /// ```rust,ignore
    /// parse(input).map_err(|e| SceneError::handler("pong.score", e))?;
    /// ```
    pub fn handler(namespace: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        SceneError::HandlerFailed {
            namespace: namespace.into(),
            source: source.into(),
        }
    }

    /// Wraps an arbitrary error as an actor failure for the given actor id.
    pub fn actor(id: ActorId, source: impl Into<anyhow::Error>) -> Self {
        SceneError::ActorFailed {
            id,
            source: source.into(),
        }
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::ActorFailed { id, source } => {
                write!(f, "Actor '{id}' failed during frame resumption: {source}")
            }
            SceneError::HandlerFailed { namespace, source } => {
                write!(f, "Handler registered under '{namespace}' failed: {source}")
            }
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::ActorFailed { source, .. }
            | SceneError::HandlerFailed { source, .. } => Some(source.as_ref()),
        }
    }
}
