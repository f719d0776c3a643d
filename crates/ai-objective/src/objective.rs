use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::behavior::{ActContext, Behavior, CheckContext};
use crate::observer::{Lifecycle, Listener, ListenerId, ObjectiveEvent, Observers};
use crate::trace::{PruneReason, TraceEvent, TraceKind};
use crate::{
    AgentId, Capabilities, ObjectiveCx, SchedulerContext, SubObjectives, World, MAX_PRIORITY,
};

static NEXT_OBJECTIVE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one objective instance. This is what the scheduler's "current order" and "current
/// objective" are compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectiveId(u64);

impl ObjectiveId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    fn next() -> Self {
        Self(NEXT_OBJECTIVE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Name of a concrete behavior type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectiveKind(pub &'static str);

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionState {
    /// Needs evaluation on the next `is_completed` read.
    #[default]
    NotChecked,
    /// Evaluated this tick, not done.
    Pending,
    Completed,
}

fn clamp_priority(priority: f32) -> f32 {
    if priority.is_nan() {
        0.0
    } else {
        priority.clamp(0.0, MAX_PRIORITY)
    }
}

/// One goal instance in an agent's objective tree.
///
/// The tree is implicit: each objective owns its sub-objectives. A node with live
/// sub-objectives never acts itself; it only delegates to them (the first one, or all of them in
/// concurrent mode) until they resolve.
pub struct Objective<W>
where
    W: World,
{
    id: ObjectiveId,
    agent: W::Agent,
    behavior: Box<dyn Behavior<W>>,
    priority: f32,
    priority_modifier: f32,
    option: String,
    is_loop: bool,
    state: CompletionState,
    abandoned: bool,
    sub_objectives: SubObjectives<W>,
    completed_observers: Observers<W::Agent>,
    abandoned_observers: Observers<W::Agent>,
}

impl<W> Objective<W>
where
    W: World,
{
    pub fn new(agent: W::Agent, behavior: impl Behavior<W>, priority_modifier: f32) -> Self {
        Self::from_boxed(agent, Box::new(behavior), priority_modifier)
    }

    pub fn from_boxed(
        agent: W::Agent,
        behavior: Box<dyn Behavior<W>>,
        priority_modifier: f32,
    ) -> Self {
        Self {
            id: ObjectiveId::next(),
            agent,
            behavior,
            priority: 0.0,
            priority_modifier,
            option: String::new(),
            is_loop: false,
            state: CompletionState::NotChecked,
            abandoned: false,
            sub_objectives: SubObjectives::new(),
            completed_observers: Observers::new(),
            abandoned_observers: Observers::new(),
        }
    }

    /// Free-form discriminator used for duplicate detection.
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = option.into();
        self
    }

    /// Override the process-wide id, e.g. for deterministic replays.
    pub fn with_id(mut self, id: ObjectiveId) -> Self {
        self.id = id;
        self
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = clamp_priority(priority);
        self
    }

    /// Looping objectives never complete through their own check.
    pub fn looping(mut self, is_loop: bool) -> Self {
        self.is_loop = is_loop;
        self
    }

    pub fn id(&self) -> ObjectiveId {
        self.id
    }

    pub fn kind(&self) -> ObjectiveKind {
        self.behavior.kind()
    }

    pub fn agent(&self) -> W::Agent {
        self.agent
    }

    pub fn option(&self) -> &str {
        &self.option
    }

    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    pub fn capabilities(&self) -> Capabilities {
        self.behavior.capabilities()
    }

    pub fn behavior(&self) -> &dyn Behavior<W> {
        self.behavior.as_ref()
    }

    pub fn behavior_mut(&mut self) -> &mut dyn Behavior<W> {
        self.behavior.as_mut()
    }

    /// Stored priority, before the modifier.
    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: f32) {
        self.priority = clamp_priority(priority);
    }

    pub fn priority_modifier(&self) -> f32 {
        self.priority_modifier
    }

    /// Effective priority: the sort key for every arbitration decision.
    pub fn get_priority(&self) -> f32 {
        self.behavior.priority(self.priority, self.priority_modifier)
    }

    /// `get_priority` as arbitration compares it: a NaN from a priority override ranks last.
    pub(crate) fn arbitration_priority(&self) -> f32 {
        let priority = self.get_priority();
        if priority.is_nan() {
            f32::NEG_INFINITY
        } else {
            priority
        }
    }

    pub fn devotion(&self, scheduler: &dyn SchedulerContext) -> f32 {
        self.behavior
            .devotion()
            .unwrap_or_else(|| scheduler.base_devotion())
    }

    pub fn is_duplicate(&self, other: &Objective<W>) -> bool {
        self.behavior.is_duplicate(self, other)
    }

    pub fn completion_state(&self) -> CompletionState {
        self.state
    }

    /// Lazily evaluates completion on the first read after the last recheck boundary.
    pub fn is_completed(&mut self, cx: &mut ObjectiveCx<'_>, world: &W) -> bool {
        if self.state == CompletionState::NotChecked {
            self.check_state(cx, world);
        }
        self.state == CompletionState::Completed
    }

    pub fn can_be_completed(&self) -> bool {
        !self.abandoned
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    /// Mark this objective abandoned. Fires the abandoned listeners once; repeated calls are
    /// no-ops until `reset`.
    pub fn abandon(&mut self, cx: &mut ObjectiveCx<'_>) {
        if self.abandoned {
            return;
        }
        self.abandoned = true;

        tracing::debug!(
            objective = self.id.raw(),
            kind = self.kind().0,
            agent = self.agent.stable_id(),
            "objective abandoned"
        );
        cx.emit(self.trace_event(cx.tick.tick, TraceKind::Abandoned));
        let event = self.lifecycle_event(Lifecycle::Abandoned);
        self.abandoned_observers.notify(&event);
    }

    /// Back to the initial unchecked, non-abandoned state. Sub-objectives and priority are kept.
    pub fn reset(&mut self) {
        self.state = CompletionState::NotChecked;
        self.abandoned = false;
        self.behavior.on_reset();
    }

    /// Force the next `is_completed` read to re-evaluate.
    pub fn invalidate_check(&mut self) {
        if self.state == CompletionState::Pending {
            self.state = CompletionState::NotChecked;
        }
    }

    pub fn on_completed(
        &mut self,
        listener: impl FnMut(&ObjectiveEvent<W::Agent>) + 'static,
    ) -> ListenerId {
        self.completed_observers.subscribe(listener)
    }

    pub fn on_abandoned(
        &mut self,
        listener: impl FnMut(&ObjectiveEvent<W::Agent>) + 'static,
    ) -> ListenerId {
        self.abandoned_observers.subscribe(listener)
    }

    pub fn observers_mut(&mut self, lifecycle: Lifecycle) -> &mut Observers<W::Agent> {
        match lifecycle {
            Lifecycle::Completed => &mut self.completed_observers,
            Lifecycle::Abandoned => &mut self.abandoned_observers,
        }
    }

    pub fn sub_objectives(&self) -> &SubObjectives<W> {
        &self.sub_objectives
    }

    pub fn sub_objectives_mut(&mut self) -> &mut SubObjectives<W> {
        &mut self.sub_objectives
    }

    pub fn add_sub_objective(&mut self, objective: Objective<W>) {
        self.sub_objectives.add(objective);
    }

    pub fn remove_sub_objective(
        &mut self,
        slot: &mut Option<ObjectiveId>,
    ) -> Option<Objective<W>> {
        self.sub_objectives.remove(slot)
    }

    /// See [`SubObjectives::try_add`].
    pub fn try_add_sub_objective<F>(
        &mut self,
        slot: &mut Option<ObjectiveId>,
        factory: F,
        on_completed: Option<Listener<W::Agent>>,
        on_abandoned: Option<Listener<W::Agent>>,
    ) -> bool
    where
        F: FnOnce() -> Objective<W>,
    {
        self.sub_objectives
            .try_add(slot, factory, on_completed, on_abandoned)
    }

    /// Every descendant in depth-first pre-order, optionally preceded by `self`.
    pub fn sub_objectives_recursive(&self, including_self: bool) -> Vec<&Objective<W>> {
        let mut out = Vec::new();
        if including_self {
            out.push(self);
        }
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'s>(&'s self, out: &mut Vec<&'s Objective<W>>) {
        for child in self.sub_objectives.iter() {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    /// Follows the first-child chain down to the leaf that is eligible to act.
    pub fn active_objective(&self) -> &Objective<W> {
        let mut current = self;
        while let Some(first) = current.sub_objectives.first() {
            current = first;
        }
        current
    }

    /// Per-tick priority evolution, top-down over the whole subtree.
    pub fn update(&mut self, cx: &mut ObjectiveCx<'_>, world: &W) {
        self.update_with_parent(None, cx, world);
    }

    fn update_with_parent(
        &mut self,
        parent: Option<ObjectiveId>,
        cx: &mut ObjectiveCx<'_>,
        world: &W,
    ) {
        // Recheck boundary: last tick's "not done yet" is stale now.
        self.invalidate_check();
        self.behavior.update(self.agent, world, &cx.tick);

        let scheduler = cx.scheduler;
        self.sub_objectives.verbose_diagnostics = scheduler.verbose_diagnostics();
        if scheduler.current_order() == Some(self.id) {
            self.priority = scheduler.order_priority();
        } else if scheduler.wait_elapsed() {
            if let Some(current) = scheduler.current_objective() {
                if current == self.id || parent == Some(current) {
                    self.priority +=
                        self.devotion(scheduler) * self.priority_modifier * cx.dt();
                }
            }
            self.priority = clamp_priority(self.priority);
        }

        let id = self.id;
        for child in self.sub_objectives.iter_mut() {
            child.update_with_parent(Some(id), cx, world);
        }
    }

    /// Order sub-objectives by descending effective priority, following only the branches that
    /// will actually execute.
    pub fn sort_sub_objectives(&mut self) {
        let capabilities = self.capabilities();
        if !capabilities.allows_sibling_sorting {
            return;
        }

        self.sub_objectives.sort_by_priority();
        if capabilities.runs_concurrently_with_children {
            for child in self.sub_objectives.iter_mut() {
                child.sort_sub_objectives();
            }
        } else if let Some(first) = self.sub_objectives.first_mut() {
            first.sort_sub_objectives();
        }
    }

    /// Re-evaluates completion: children first, pruning whatever resolved, then this node's own
    /// check if no children are left. Returns whether this node is completed.
    pub(crate) fn check_state(&mut self, cx: &mut ObjectiveCx<'_>, world: &W) -> bool {
        self.prune_sub_objectives(cx, world);

        if self.state == CompletionState::Completed {
            return true;
        }
        self.state = CompletionState::Pending;

        if self.sub_objectives.is_empty() && !self.abandoned && !self.is_loop {
            let mut check_cx = CheckContext::new(self.id, self.agent, cx.tick, cx.scheduler, world);
            let done = self.behavior.check(&mut check_cx);
            if check_cx.abandon_requested() {
                self.abandon(cx);
            } else if done {
                self.mark_completed(cx);
            }
        }

        self.state == CompletionState::Completed
    }

    fn prune_sub_objectives(&mut self, cx: &mut ObjectiveCx<'_>, world: &W) {
        let abandon_on_failure = self.capabilities().abandon_when_subgoals_fail;

        // Index-based: listeners fired by a child may not touch this list, but the list shrinks
        // as we prune.
        let mut i = 0;
        while i < self.sub_objectives.len() {
            let child = &mut self.sub_objectives.items[i];
            // Memoized: a child evaluated since the last recheck boundary is not checked again.
            let reason = if child.is_completed(cx, world) {
                PruneReason::Completed
            } else if !child.can_be_completed() {
                PruneReason::CannotBeCompleted
            } else {
                i += 1;
                continue;
            };

            let child = self.sub_objectives.items.remove(i);
            if cx.scheduler.verbose_diagnostics() {
                tracing::debug!(
                    parent = self.id.raw(),
                    objective = child.id.raw(),
                    kind = child.kind().0,
                    reason = ?reason,
                    "pruned sub-objective"
                );
            }
            cx.emit(child.trace_event(cx.tick.tick, TraceKind::Pruned(reason)));

            if reason == PruneReason::CannotBeCompleted && abandon_on_failure {
                self.abandon(cx);
            }
        }
    }

    fn mark_completed(&mut self, cx: &mut ObjectiveCx<'_>) {
        if self.state == CompletionState::Completed {
            return;
        }
        self.state = CompletionState::Completed;

        tracing::debug!(
            objective = self.id.raw(),
            kind = self.kind().0,
            agent = self.agent.stable_id(),
            "objective completed"
        );
        cx.emit(self.trace_event(cx.tick.tick, TraceKind::Completed));
        let event = self.lifecycle_event(Lifecycle::Completed);
        self.completed_observers.notify(&event);
    }

    /// One tick of arbitration: check state, then delegate to sub-objectives or act as a leaf.
    pub fn try_complete(&mut self, cx: &mut ObjectiveCx<'_>, world: &mut W) {
        if self.state == CompletionState::Completed || self.abandoned {
            return;
        }
        if self.check_state(cx, &*world) || self.abandoned {
            return;
        }

        if self.sub_objectives.is_empty() {
            self.act(cx, world);
            return;
        }

        let concurrent = self.capabilities().runs_concurrently_with_children;
        let mut i = 0;
        while i < self.sub_objectives.len() {
            self.sub_objectives.items[i].try_complete(cx, world);
            if !concurrent {
                break;
            }
            i += 1;
        }
    }

    fn act(&mut self, cx: &mut ObjectiveCx<'_>, world: &mut W) {
        self.sub_objectives.verbose_diagnostics = cx.scheduler.verbose_diagnostics();
        let mut act_cx = ActContext::new(
            self.id,
            self.agent,
            cx.tick,
            cx.scheduler,
            world,
            &mut self.sub_objectives,
        );
        self.behavior.act(&mut act_cx);
        let abandon = act_cx.abandon_requested();

        tracing::debug!(
            objective = self.id.raw(),
            kind = self.kind().0,
            agent = self.agent.stable_id(),
            "objective acted"
        );
        cx.emit(self.trace_event(cx.tick.tick, TraceKind::Acted));
        if abandon {
            self.abandon(cx);
        }
    }

    pub(crate) fn select(&mut self, cx: &mut ObjectiveCx<'_>) {
        self.behavior.on_selected(self.agent);
        cx.emit(self.trace_event(cx.tick.tick, TraceKind::Selected));
    }

    pub(crate) fn deselect(&mut self, cx: &mut ObjectiveCx<'_>) {
        self.behavior.on_deselected(self.agent);
        cx.emit(self.trace_event(cx.tick.tick, TraceKind::Deselected));
    }

    fn lifecycle_event(&self, lifecycle: Lifecycle) -> ObjectiveEvent<W::Agent> {
        ObjectiveEvent {
            objective: self.id,
            kind: self.kind(),
            agent: self.agent,
            lifecycle,
        }
    }

    fn trace_event(&self, tick: u64, event: TraceKind) -> TraceEvent {
        TraceEvent::new(tick, self.id.raw(), event)
            .with_agent(self.agent.stable_id())
            .with_kind(self.kind().0)
    }
}

impl<W> fmt::Debug for Objective<W>
where
    W: World,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Objective")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("agent", &self.agent)
            .field("option", &self.option)
            .field("priority", &self.priority)
            .field("priority_modifier", &self.priority_modifier)
            .field("state", &self.state)
            .field("abandoned", &self.abandoned)
            .field("sub_objectives", &self.sub_objectives.len())
            .finish()
    }
}
