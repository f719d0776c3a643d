use crate::trace::TraceSink;
use crate::{
    CompletionState, Objective, ObjectiveCx, ObjectiveError, ObjectiveId, SchedulerConfig,
    SchedulerContext, SchedulerState, TickContext, World,
};

/// Owns an agent's root objectives and picks which one dominates each tick.
///
/// Tick order:
/// 1. count the wait timer down
/// 2. `update` the pinned order and every root (this is also the per-tick recheck boundary)
/// 3. drop roots that completed or were abandoned
/// 4. select the highest effective priority (the pinned order wins ties, then root order)
/// 5. sort the selected root's sub-objectives and `try_complete` it
/// 6. drop whatever resolved during step 5
pub struct ObjectiveManager<W>
where
    W: World,
{
    agent: W::Agent,
    state: SchedulerState,
    objectives: Vec<Objective<W>>,
    order: Option<Objective<W>>,
}

impl<W> ObjectiveManager<W>
where
    W: World,
{
    pub fn new(agent: W::Agent, config: SchedulerConfig) -> Self {
        Self {
            agent,
            state: SchedulerState::new(config),
            objectives: Vec::new(),
            order: None,
        }
    }

    pub fn agent(&self) -> W::Agent {
        self.agent
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SchedulerState {
        &mut self.state
    }

    pub fn objectives(&self) -> &[Objective<W>] {
        &self.objectives
    }

    pub fn order(&self) -> Option<&Objective<W>> {
        self.order.as_ref()
    }

    pub fn get(&self, id: ObjectiveId) -> Option<&Objective<W>> {
        self.order
            .iter()
            .chain(self.objectives.iter())
            .find(|o| o.id() == id)
    }

    pub fn current_objective(&self) -> Option<&Objective<W>> {
        let id = self.state.current_objective()?;
        self.get(id)
    }

    /// Schedule a root objective. Rejected when an equivalent one is already scheduled.
    pub fn add_objective(
        &mut self,
        objective: Objective<W>,
    ) -> Result<ObjectiveId, ObjectiveError> {
        if let Some(existing) = self.objectives.iter().find(|o| o.is_duplicate(&objective)) {
            return Err(ObjectiveError::DuplicateObjective { id: existing.id() });
        }
        let id = objective.id();
        self.objectives.push(objective);
        Ok(id)
    }

    /// Pin `order` as the current order, replacing (and returning) any previous one.
    pub fn set_order(&mut self, order: Objective<W>) -> Option<Objective<W>> {
        self.state.set_current_order(Some(order.id()));
        self.order.replace(order)
    }

    pub fn clear_order(&mut self) -> Option<Objective<W>> {
        self.state.set_current_order(None);
        self.order.take()
    }

    pub fn tick(&mut self, tick: TickContext, world: &mut W, trace: &mut dyn TraceSink) {
        self.state.count_down(tick.dt_seconds);

        {
            let mut cx = ObjectiveCx::new(tick, &self.state, &mut *trace);
            if let Some(order) = self.order.as_mut() {
                order.update(&mut cx, &*world);
            }
            for objective in self.objectives.iter_mut() {
                objective.update(&mut cx, &*world);
            }

            self.objectives
                .retain_mut(|o| !o.is_completed(&mut cx, &*world) && o.can_be_completed());
            let order_resolved = self
                .order
                .as_mut()
                .is_some_and(|o| o.is_completed(&mut cx, &*world) || !o.can_be_completed());
            if order_resolved {
                self.order = None;
            }
        }
        if self.order.is_none() {
            self.state.set_current_order(None);
        }

        let selected = self.select();
        self.switch_to(selected, tick, trace);

        if let Some(id) = selected {
            let mut cx = ObjectiveCx::new(tick, &self.state, &mut *trace);
            if let Some(current) = find_mut(&mut self.order, &mut self.objectives, id) {
                current.sort_sub_objectives();
                current.try_complete(&mut cx, world);
            }
        }

        self.sweep_resolved();
    }

    fn select(&self) -> Option<ObjectiveId> {
        let mut best: Option<(ObjectiveId, f32)> = None;
        for objective in self.order.iter().chain(self.objectives.iter()) {
            let priority = objective.arbitration_priority();
            match best {
                Some((_, best_priority)) if priority.total_cmp(&best_priority).is_le() => {}
                _ => best = Some((objective.id(), priority)),
            }
        }
        best.map(|(id, _)| id)
    }

    fn switch_to(
        &mut self,
        selected: Option<ObjectiveId>,
        tick: TickContext,
        trace: &mut dyn TraceSink,
    ) {
        let previous = self.state.current_objective();
        if previous == selected {
            return;
        }

        {
            let mut cx = ObjectiveCx::new(tick, &self.state, &mut *trace);
            if let Some(id) = previous {
                if let Some(prev) = find_mut(&mut self.order, &mut self.objectives, id) {
                    prev.deselect(&mut cx);
                }
            }
            if let Some(id) = selected {
                if let Some(next) = find_mut(&mut self.order, &mut self.objectives, id) {
                    next.select(&mut cx);
                }
            }
        }

        tracing::debug!(
            agent = ?self.agent,
            from = ?previous,
            to = ?selected,
            "current objective changed"
        );
        self.state.set_current_objective(selected);
    }

    fn sweep_resolved(&mut self) {
        let resolved = |o: &Objective<W>| {
            o.completion_state() == CompletionState::Completed || o.is_abandoned()
        };

        self.objectives.retain(|o| !resolved(o));
        if self.order.as_ref().is_some_and(|o| resolved(o)) {
            self.clear_order();
        }

        let current = self.state.current_objective();
        if current.is_some_and(|id| self.get(id).is_none()) {
            self.state.set_current_objective(None);
        }
    }
}

fn find_mut<'a, W: World>(
    order: &'a mut Option<Objective<W>>,
    objectives: &'a mut [Objective<W>],
    id: ObjectiveId,
) -> Option<&'a mut Objective<W>> {
    order
        .iter_mut()
        .chain(objectives.iter_mut())
        .find(|o| o.id() == id)
}
