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

//! External event feeds pumped once per frame.

use crate::event::payload::Event;

/// The outcome of pumping an [`EventSource`] once.
#[derive(Debug)]
pub enum SourcePump {
    /// Events gathered this frame, in arrival order. May be empty.
    Events(Vec<(String, Event)>),
    /// The source will never produce again; the scene should stop ticking.
    Exhausted,
}

/// A non-blocking feed of typed events from outside the scene.
///
/// The scene pumps its source exactly once at the top of every tick and
/// queues whatever came in. `pump` must not block: return whatever is
/// available now and `Events(vec![])` when nothing is.
pub trait EventSource {
    /// Gathers all events that arrived since the last pump.
    fn pump(&mut self) -> SourcePump;
}

/// An [`EventSource`] fed from other threads over a [`flume`] channel.
///
/// Producers hold the `Sender` half and push `(event type, event)` pairs;
/// the scene drains the receiver each tick. Once every sender is dropped
/// and the channel is empty, the source reports itself exhausted.
pub struct ChannelSource {
    receiver: flume::Receiver<(String, Event)>,
}

impl ChannelSource {
    /// Creates an unbounded channel and the source wrapping its receiving end.
    pub fn unbounded() -> (flume::Sender<(String, Event)>, Self) {
        let (sender, receiver) = flume::unbounded();
        (sender, Self { receiver })
    }
}

impl EventSource for ChannelSource {
    fn pump(&mut self) -> SourcePump {
        let mut batch = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(pair) => batch.push(pair),
                Err(flume::TryRecvError::Empty) => break,
                Err(flume::TryRecvError::Disconnected) => {
                    // Deliver what was already buffered; report exhaustion
                    // on the next pump, when the batch is empty.
                    if batch.is_empty() {
                        return SourcePump::Exhausted;
                    }
                    break;
                }
            }
        }
        SourcePump::Events(batch)
    }
}
