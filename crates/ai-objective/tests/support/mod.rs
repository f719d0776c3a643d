#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ai_objective::{
    ActContext, Behavior, Capabilities, CheckContext, ObjectiveKind, TickContext, World,
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub const AGENT: u64 = 7;

pub fn tick(n: u64) -> TickContext {
    TickContext::new(n, 0.5)
}

#[derive(Debug, Default)]
pub struct RecordingWorld {
    pub acted: Vec<&'static str>,
}

impl World for RecordingWorld {
    type Agent = u64;
}

/// Shared switches a test flips from the outside.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    pub done: Rc<Cell<bool>>,
    pub give_up: Rc<Cell<bool>>,
    pub checks: Rc<Cell<u32>>,
    pub acts: Rc<Cell<u32>>,
}

impl Probe {
    pub fn finish(&self) {
        self.done.set(true);
    }
}

/// Generic goal whose kind is its name.
pub struct Goal {
    pub name: &'static str,
    pub probe: Probe,
    pub caps: Capabilities,
    pub devotion: Option<f32>,
    pub abandon_on_act: bool,
}

impl Goal {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            probe: Probe::default(),
            caps: Capabilities::default(),
            devotion: None,
            abandon_on_act: false,
        }
    }

    pub fn with_probe(mut self, probe: &Probe) -> Self {
        self.probe = probe.clone();
        self
    }

    pub fn with_caps(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    pub fn with_devotion(mut self, devotion: f32) -> Self {
        self.devotion = Some(devotion);
        self
    }

    pub fn abandoning_on_act(mut self) -> Self {
        self.abandon_on_act = true;
        self
    }
}

impl Behavior<RecordingWorld> for Goal {
    fn kind(&self) -> ObjectiveKind {
        ObjectiveKind(self.name)
    }

    fn act(&mut self, cx: &mut ActContext<'_, RecordingWorld>) {
        self.probe.acts.set(self.probe.acts.get() + 1);
        cx.world.acted.push(self.name);
        if self.abandon_on_act {
            cx.abandon();
        }
    }

    fn check(&mut self, cx: &mut CheckContext<'_, RecordingWorld>) -> bool {
        self.probe.checks.set(self.probe.checks.get() + 1);
        if self.probe.give_up.get() {
            cx.abandon();
        }
        self.probe.done.get()
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn devotion(&self) -> Option<f32> {
        self.devotion
    }
}

pub fn counter() -> Rc<Cell<u32>> {
    Rc::new(Cell::new(0))
}

pub fn bump(counter: &Rc<Cell<u32>>) -> impl FnMut(&ai_objective::ObjectiveEvent<u64>) + 'static {
    let counter = counter.clone();
    move |_| counter.set(counter.get() + 1)
}

/// Counts `tracing` events at one level, optionally only those carrying a given field.
struct EventCounter {
    level: Level,
    field: Option<&'static str>,
    seen: Arc<AtomicUsize>,
}

impl<S: Subscriber> Layer<S> for EventCounter {
    fn on_event(&self, event: &Event<'_>, _cx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() != self.level {
            return;
        }
        if self.field.is_some_and(|name| metadata.fields().field(name).is_none()) {
            return;
        }
        self.seen.fetch_add(1, Ordering::SeqCst);
    }
}

/// Runs `f` under a thread-local subscriber and returns how many matching events it logged.
pub fn count_events(level: Level, field: Option<&'static str>, f: impl FnOnce()) -> usize {
    let seen = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(EventCounter {
        level,
        field,
        seen: seen.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    seen.load(Ordering::SeqCst)
}
