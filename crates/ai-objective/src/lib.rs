//! Hierarchical objective scheduling for autonomous agents.
//!
//! Each agent keeps a tree of prioritized objectives. An objective may decompose into
//! sub-objectives that resolve before it (sequential mode, only the first child runs) or alongside
//! it (concurrent mode, every child runs). Every tick the manager:
//!
//! - `update`s every root: priorities grow with devotion while a goal is the focus, so an agent
//!   committed to a goal doesn't thrash between near-equal alternatives;
//! - picks the dominant root and `try_complete`s it: finished and impossible sub-objectives are
//!   pruned, and only leaves of the live tree act.
//!
//! Concrete goals plug in through [`Behavior`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod behavior;
pub mod capabilities;
pub mod config;
pub mod context;
pub mod error;
pub mod manager;
pub mod objective;
pub mod observer;
pub mod sub_objectives;
pub mod tick;
pub mod trace;
pub mod world;

pub use agent::AgentId;
pub use behavior::{ActContext, Behavior, CheckContext};
pub use capabilities::Capabilities;
pub use config::{SchedulerConfig, MAX_PRIORITY};
pub use context::{ObjectiveCx, SchedulerContext, SchedulerState};
pub use error::{ConfigError, ObjectiveError};
pub use manager::ObjectiveManager;
pub use objective::{CompletionState, Objective, ObjectiveId, ObjectiveKind};
pub use observer::{Lifecycle, Listener, ListenerId, ObjectiveEvent, Observers};
pub use sub_objectives::SubObjectives;
pub use tick::TickContext;
pub use trace::{
    NullTraceSink, PruneReason, TraceEvent, TraceKind, TraceLog, TraceSink, VecTraceSink,
};
pub use world::World;
