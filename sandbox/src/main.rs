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

//! A small playground scene: a remote producer thread feeds key events
//! over a channel while a fixed-step actor advances a position each frame.

use gyre_core::event::{handler, Binding, ChannelSource, Handled};
use gyre_core::{Actor, ActorYield, Event, Scene, TickStatus};
use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

/// Integrates at a fixed 50 Hz step, rerunning to catch up when a frame
/// delivered more time than one step covers.
struct Mover {
    position: f32,
    velocity: f32,
    accumulated: f32,
}

const STEP: f32 = 0.02;

impl Actor for Mover {
    fn resume(&mut self, dt: f32) -> anyhow::Result<ActorYield> {
        self.accumulated += dt;
        if self.accumulated >= STEP {
            self.accumulated -= STEP;
            self.position += self.velocity * STEP;
            log::debug!("Mover at {:.3}", self.position);
            // Consume the remaining backlog this same frame.
            return Ok(ActorYield::Rerun { dt: 0.0 });
        }
        Ok(ActorYield::Done { dt })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut scene = Scene::new();
    let (sender, source) = ChannelSource::unbounded();
    scene.set_event_source(Box::new(source));

    // Pretend input device: a burst of key presses, then hang up.
    thread::spawn(move || {
        for key in ["w", "w", "a", "d", "w"] {
            let event = Event::new().with("key", key);
            if sender.send(("input.key.down".to_string(), event)).is_err() {
                return;
            }
            thread::sleep(Duration::from_millis(30));
        }
    });

    let mover = Rc::new(RefCell::new(Mover {
        position: 0.0,
        velocity: 1.0,
        accumulated: 0.0,
    }));
    scene.register_actor("mover", Rc::clone(&mover) as Rc<RefCell<dyn Actor>>);

    let presses = Rc::new(RefCell::new(0u32));
    let on_key = {
        let mover = Rc::clone(&mover);
        let presses = Rc::clone(&presses);
        handler(move |args| {
            if let Some(key) = args.get(0).and_then(|v| v.as_str()) {
                *presses.borrow_mut() += 1;
                let mut mover = mover.borrow_mut();
                mover.velocity = match key {
                    "w" => mover.velocity + 0.5,
                    "a" | "d" => -mover.velocity,
                    _ => mover.velocity,
                };
                log::info!("key '{key}' -> velocity {:.2}", mover.velocity);
            }
            Ok(Handled::Pass)
        })
    };
    scene.register_with("input.key.down", on_key, Binding::new().arg("key"), 0);

    let mut last = Instant::now();
    loop {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        match scene.tick(dt)? {
            TickStatus::Running => thread::sleep(Duration::from_millis(16)),
            TickStatus::SourceExhausted => break,
        }
    }

    log::info!(
        "shutting down: {} key presses, final position {:.3}",
        presses.borrow(),
        mover.borrow().position
    );
    Ok(())
}
