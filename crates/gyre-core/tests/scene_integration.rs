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

//! End-to-end scene behavior: queue draining, handler ordering, actors,
//! dynamic paths, and event sources working together across full ticks.

use gyre_core::event::{handler, Binding, ChannelSource, Handled, Handler};
use gyre_core::{Actor, ActorId, ActorYield, Event, Scene, TickStatus};
use std::cell::RefCell;
use std::rc::Rc;

/// Routes `log` output through the test harness when `RUST_LOG` is set.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tracing(trace: &Rc<RefCell<Vec<String>>>, label: &str) -> Handler {
    let trace = Rc::clone(trace);
    let label = label.to_string();
    handler(move |_| {
        trace.borrow_mut().push(label.clone());
        Ok(Handled::Pass)
    })
}

#[test]
fn tick_drains_queued_events() {
    init_logging();
    let mut scene = Scene::new();
    let trace = Rc::new(RefCell::new(Vec::new()));
    scene.register("game.score", tracing(&trace, "scored"));

    scene.queue("game.score", Event::new().with("points", 10));
    assert!(trace.borrow().is_empty());

    scene.tick(0.016).unwrap();
    assert_eq!(*trace.borrow(), ["scored"]);

    // Already delivered; the next tick must not replay it.
    scene.tick(0.016).unwrap();
    assert_eq!(*trace.borrow(), ["scored"]);
}

#[test]
fn event_queued_by_a_handler_lands_in_the_same_tick() {
    let mut scene = Scene::new();
    let trace = Rc::new(RefCell::new(Vec::new()));
    let queue = scene.queue_handle();

    let spawner = {
        let trace = Rc::clone(&trace);
        handler(move |_| {
            trace.borrow_mut().push("died".to_string());
            queue.queue("game.respawn", Event::new());
            Ok(Handled::Pass)
        })
    };
    scene.register("game.death", spawner);
    scene.register("game.respawn", tracing(&trace, "respawned"));

    scene.queue("game.death", Event::new());
    scene.tick(0.016).unwrap();

    assert_eq!(*trace.borrow(), ["died", "respawned"]);
}

#[test]
fn lower_priority_value_runs_first_regardless_of_specificity() {
    let mut scene = Scene::new();
    let trace = Rc::new(RefCell::new(Vec::new()));

    // The broad subscriber registered at priority 5 waits for the specific
    // one at priority 0, even though it was registered first.
    scene.register_with("input", tracing(&trace, "p5"), Binding::new(), 5);
    scene.register_with(
        "input.keyboard.down",
        tracing(&trace, "p0"),
        Binding::new(),
        0,
    );

    scene.queue("input.keyboard.down", Event::new().with("key", "space"));
    scene.tick(0.016).unwrap();

    assert_eq!(*trace.borrow(), ["p0", "p5"]);
}

#[test]
fn dispatch_order_is_ascending_in_priority() {
    init_logging();
    let mut scene = Scene::new();
    let trace = Rc::new(RefCell::new(Vec::new()));
    scene.register_with("game.score", tracing(&trace, "p5"), Binding::new(), 5);
    scene.register_with("game.score", tracing(&trace, "p0"), Binding::new(), 0);

    scene.queue("game.score", Event::new());
    scene.tick(0.016).unwrap();

    assert_eq!(*trace.borrow(), ["p0", "p5"]);
}

#[test]
fn clear_namespace_silences_descendants_only() {
    let mut scene = Scene::new();
    let trace = Rc::new(RefCell::new(Vec::new()));
    scene.register("game", tracing(&trace, "game"));
    scene.register("game.score", tracing(&trace, "score"));
    scene.register("gamey", tracing(&trace, "gamey"));

    scene.clear_namespace("game");

    scene.queue("game.score", Event::new());
    scene.queue("gamey", Event::new());
    scene.tick(0.016).unwrap();

    // "game" and "game.score" are gone; "gamey" is not a descendant.
    assert_eq!(*trace.borrow(), ["gamey"]);
}

#[test]
fn unregister_removes_one_handler_and_keeps_the_rest() {
    let mut scene = Scene::new();
    let trace = Rc::new(RefCell::new(Vec::new()));
    let doomed = tracing(&trace, "doomed");
    scene.register("ui.click", doomed.clone());
    scene.register("ui.click", tracing(&trace, "kept"));

    scene.unregister("ui.click", &doomed);

    scene.queue("ui.click", Event::new());
    scene.tick(0.016).unwrap();
    assert_eq!(*trace.borrow(), ["kept"]);
}

struct Counter {
    resumes: u32,
    seen_dt: Vec<f32>,
    forward: f32,
}

impl Actor for Counter {
    fn resume(&mut self, dt: f32) -> anyhow::Result<ActorYield> {
        self.resumes += 1;
        self.seen_dt.push(dt);
        Ok(ActorYield::Done { dt: self.forward })
    }
}

#[test]
fn actors_resume_once_per_tick_with_chained_dt() {
    let mut scene = Scene::new();
    let first = Rc::new(RefCell::new(Counter {
        resumes: 0,
        seen_dt: Vec::new(),
        forward: 0.5,
    }));
    let second = Rc::new(RefCell::new(Counter {
        resumes: 0,
        seen_dt: Vec::new(),
        forward: 0.0,
    }));
    scene.register_actor("first", first.clone());
    scene.register_actor("second", second.clone());

    scene.tick(1.0).unwrap();
    scene.tick(1.0).unwrap();

    assert_eq!(first.borrow().resumes, 2);
    assert_eq!(first.borrow().seen_dt, [1.0, 1.0]);
    // The second actor receives whatever the first yielded, not the
    // frame's own dt.
    assert_eq!(second.borrow().seen_dt, [0.5, 0.5]);
}

struct CatchUp {
    pending_steps: u32,
    resumes: u32,
}

impl Actor for CatchUp {
    fn resume(&mut self, dt: f32) -> anyhow::Result<ActorYield> {
        self.resumes += 1;
        if self.pending_steps > 0 {
            self.pending_steps -= 1;
            Ok(ActorYield::Rerun { dt })
        } else {
            Ok(ActorYield::Done { dt })
        }
    }
}

#[test]
fn rerun_stays_within_one_tick() {
    let mut scene = Scene::new();
    let actor = Rc::new(RefCell::new(CatchUp {
        pending_steps: 3,
        resumes: 0,
    }));
    scene.register_actor("catch-up", actor.clone());

    scene.tick(0.016).unwrap();
    assert_eq!(actor.borrow().resumes, 4);

    scene.tick(0.016).unwrap();
    assert_eq!(actor.borrow().resumes, 5);
}

#[test]
fn deregistered_actor_is_skipped_next_tick() {
    let mut scene = Scene::new();
    let actor = Rc::new(RefCell::new(Counter {
        resumes: 0,
        seen_dt: Vec::new(),
        forward: 0.0,
    }));
    scene.register_actor("fleeting", actor.clone());

    scene.tick(0.016).unwrap();
    assert!(scene.deregister_actor(&ActorId::new("fleeting")));
    scene.tick(0.016).unwrap();

    assert_eq!(actor.borrow().resumes, 1);
    assert_eq!(scene.actor_count(), 0);
}

#[test]
fn channel_source_feeds_events_and_signals_exhaustion() {
    let mut scene = Scene::new();
    let trace = Rc::new(RefCell::new(Vec::new()));
    scene.register("net.message", tracing(&trace, "message"));

    let (sender, source) = ChannelSource::unbounded();
    scene.set_event_source(Box::new(source));

    sender
        .send(("net.message".to_string(), Event::new().with("body", "hi")))
        .unwrap();
    assert_eq!(scene.tick(0.016).unwrap(), TickStatus::Running);
    assert_eq!(*trace.borrow(), ["message"]);

    drop(sender);
    assert_eq!(scene.tick(0.016).unwrap(), TickStatus::SourceExhausted);
    // An exhausted source stops the frame before handlers run again.
    assert_eq!(*trace.borrow(), ["message"]);
}

#[test]
fn dynamic_paths_follow_rebinding() {
    let mut scene = Scene::new();
    let trace = Rc::new(RefCell::new(Vec::new()));
    scene.register_dynamic("ui.menu", "menu.on_select");

    // Unbound path: the event is dropped for that entry.
    scene.queue("ui.menu", Event::new());
    scene.tick(0.016).unwrap();
    assert!(trace.borrow().is_empty());

    scene.bind("menu.on_select", tracing(&trace, "v1"));
    scene.queue("ui.menu", Event::new());
    scene.tick(0.016).unwrap();
    assert_eq!(*trace.borrow(), ["v1"]);

    scene.bind("menu.on_select", tracing(&trace, "v2"));
    scene.queue("ui.menu", Event::new());
    scene.tick(0.016).unwrap();
    assert_eq!(*trace.borrow(), ["v1", "v2"]);
}

#[test]
fn bindings_extract_fields_and_skip_on_missing() {
    let mut scene = Scene::new();
    let captured = Rc::new(RefCell::new(Vec::new()));
    let probe = {
        let captured = Rc::clone(&captured);
        handler(move |args| {
            if let Some(key) = args.get(0).and_then(|v| v.as_str()) {
                captured.borrow_mut().push(key.to_string());
            }
            Ok(Handled::Pass)
        })
    };
    scene.register_with(
        "input.key.down",
        probe,
        Binding::new().arg("key"),
        0,
    );

    scene.queue("input.key.down", Event::new().with("key", "escape"));
    // Lacks "key": this entry is skipped, not an error.
    scene.queue("input.key.down", Event::new().with("scancode", 41));
    scene.tick(0.016).unwrap();

    assert_eq!(*captured.borrow(), ["escape"]);
}

#[test]
fn consumed_event_stops_later_handlers() {
    let mut scene = Scene::new();
    let trace = Rc::new(RefCell::new(Vec::new()));
    let claim = {
        let trace = Rc::clone(&trace);
        handler(move |_| {
            trace.borrow_mut().push("modal".to_string());
            Ok(Handled::Consumed)
        })
    };
    scene.register_with("input.click", claim, Binding::new(), -10);
    scene.register("input.click", tracing(&trace, "world"));

    scene.queue("input.click", Event::new());
    scene.tick(0.016).unwrap();
    assert_eq!(*trace.borrow(), ["modal"]);
}

#[test]
fn drain_delivers_queued_events_without_a_tick() {
    let scene = Scene::new();
    let trace = Rc::new(RefCell::new(Vec::new()));
    scene.register("game.score", tracing(&trace, "scored"));

    scene.queue("game.score", Event::new().with("points", 3));
    scene.drain().unwrap();
    assert_eq!(*trace.borrow(), ["scored"]);

    // The queue is spent; draining again delivers nothing.
    scene.drain().unwrap();
    assert_eq!(*trace.borrow(), ["scored"]);
}
