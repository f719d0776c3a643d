use crate::trace::{TraceEvent, TraceSink};
use crate::{ObjectiveId, SchedulerConfig, TickContext};

/// What the objective tree reads from its manager.
///
/// The tree never owns or mutates this; the manager advances it between ticks.
pub trait SchedulerContext {
    /// The externally pinned order, if any. Its priority is forced to `order_priority`.
    fn current_order(&self) -> Option<ObjectiveId>;

    /// Seconds left before devotion accumulates. Elapsed when `<= 0`.
    fn wait_timer(&self) -> f32;

    /// The root objective the manager picked on its last selection pass.
    fn current_objective(&self) -> Option<ObjectiveId>;

    fn order_priority(&self) -> f32;

    fn base_devotion(&self) -> f32;

    fn verbose_diagnostics(&self) -> bool {
        false
    }

    fn wait_elapsed(&self) -> bool {
        self.wait_timer() <= 0.0
    }
}

/// Stock `SchedulerContext` backed by a `SchedulerConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerState {
    config: SchedulerConfig,
    wait_timer: f32,
    current_order: Option<ObjectiveId>,
    current_objective: Option<ObjectiveId>,
}

impl SchedulerState {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            wait_timer: config.initial_wait_seconds,
            current_order: None,
            current_objective: None,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn set_current_order(&mut self, order: Option<ObjectiveId>) {
        self.current_order = order;
    }

    pub fn set_current_objective(&mut self, objective: Option<ObjectiveId>) {
        self.current_objective = objective;
    }

    pub fn set_wait_timer(&mut self, seconds: f32) {
        self.wait_timer = seconds;
    }

    /// Count the wait timer down by one tick. Stops at zero.
    pub fn count_down(&mut self, dt_seconds: f32) {
        if self.wait_timer > 0.0 {
            self.wait_timer = (self.wait_timer - dt_seconds).max(0.0);
        }
    }
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl SchedulerContext for SchedulerState {
    fn current_order(&self) -> Option<ObjectiveId> {
        self.current_order
    }

    fn wait_timer(&self) -> f32 {
        self.wait_timer
    }

    fn current_objective(&self) -> Option<ObjectiveId> {
        self.current_objective
    }

    fn order_priority(&self) -> f32 {
        self.config.order_priority
    }

    fn base_devotion(&self) -> f32 {
        self.config.base_devotion
    }

    fn verbose_diagnostics(&self) -> bool {
        self.config.verbose_diagnostics
    }
}

/// Everything a tree traversal carries besides the world: timing, the manager's view, and the
/// trace sink lifecycle records go to.
pub struct ObjectiveCx<'a> {
    pub tick: TickContext,
    pub scheduler: &'a dyn SchedulerContext,
    pub trace: &'a mut dyn TraceSink,
}

impl<'a> ObjectiveCx<'a> {
    pub fn new(
        tick: TickContext,
        scheduler: &'a dyn SchedulerContext,
        trace: &'a mut dyn TraceSink,
    ) -> Self {
        Self {
            tick,
            scheduler,
            trace,
        }
    }

    pub fn dt(&self) -> f32 {
        self.tick.dt_seconds
    }

    pub(crate) fn emit(&mut self, event: TraceEvent) {
        self.trace.emit(event);
    }
}
