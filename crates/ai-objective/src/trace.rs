#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What happened to an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraceKind {
    /// The objective was a leaf in the live tree and ran its behavior for the tick.
    Acted,
    Completed,
    Abandoned,
    /// The objective was detached from its parent while its parent re-evaluated completion.
    Pruned(PruneReason),
    Selected,
    Deselected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PruneReason {
    Completed,
    CannotBeCompleted,
}

/// Deterministic lifecycle record.
///
/// This is plain data so it can be recorded during simulation, compared in tests, and dumped by
/// tooling. `tracing` output is for humans; this is for replays.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub agent: u64,
    pub objective: u64,
    pub kind: String,
    pub event: TraceKind,
}

impl TraceEvent {
    pub fn new(tick: u64, objective: u64, event: TraceKind) -> Self {
        Self {
            tick,
            agent: 0,
            objective,
            kind: String::new(),
            event,
        }
    }

    pub fn with_agent(mut self, agent: u64) -> Self {
        self.agent = agent;
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl VecTraceSink {
    pub fn count(&self, objective: u64, event: TraceKind) -> usize {
        self.events
            .iter()
            .filter(|e| e.objective == objective && e.event == event)
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// A serializable batch of events, e.g. one simulation run.
#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

impl From<VecTraceSink> for TraceLog {
    fn from(sink: VecTraceSink) -> Self {
        Self {
            events: sink.events,
        }
    }
}
