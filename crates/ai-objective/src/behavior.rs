use crate::{
    Capabilities, Objective, ObjectiveId, ObjectiveKind, SchedulerContext, SubObjectives,
    TickContext, World,
};

/// What a behavior sees while acting as a leaf of the live tree.
///
/// `sub_objectives` is the acting node's own child list. Anything added there is picked up by
/// the next `Objective::try_complete`: once the list is non-empty the node stops acting until
/// its children resolve.
pub struct ActContext<'a, W: World> {
    pub objective: ObjectiveId,
    pub agent: W::Agent,
    pub tick: TickContext,
    pub scheduler: &'a dyn SchedulerContext,
    pub world: &'a mut W,
    pub sub_objectives: &'a mut SubObjectives<W>,
    abandon: bool,
}

impl<'a, W: World> ActContext<'a, W> {
    pub(crate) fn new(
        objective: ObjectiveId,
        agent: W::Agent,
        tick: TickContext,
        scheduler: &'a dyn SchedulerContext,
        world: &'a mut W,
        sub_objectives: &'a mut SubObjectives<W>,
    ) -> Self {
        Self {
            objective,
            agent,
            tick,
            scheduler,
            world,
            sub_objectives,
            abandon: false,
        }
    }

    pub fn dt(&self) -> f32 {
        self.tick.dt_seconds
    }

    /// Give up on this objective once `act` returns.
    pub fn abandon(&mut self) {
        self.abandon = true;
    }

    pub(crate) fn abandon_requested(&self) -> bool {
        self.abandon
    }
}

/// What a behavior sees while its terminal condition is evaluated.
pub struct CheckContext<'a, W: World> {
    pub objective: ObjectiveId,
    pub agent: W::Agent,
    pub tick: TickContext,
    pub scheduler: &'a dyn SchedulerContext,
    pub world: &'a W,
    abandon: bool,
}

impl<'a, W: World> CheckContext<'a, W> {
    pub(crate) fn new(
        objective: ObjectiveId,
        agent: W::Agent,
        tick: TickContext,
        scheduler: &'a dyn SchedulerContext,
        world: &'a W,
    ) -> Self {
        Self {
            objective,
            agent,
            tick,
            scheduler,
            world,
            abandon: false,
        }
    }

    /// The goal can no longer be reached. Takes precedence over a `true` check result.
    pub fn abandon(&mut self) {
        self.abandon = true;
    }

    pub(crate) fn abandon_requested(&self) -> bool {
        self.abandon
    }
}

/// A concrete goal type: go somewhere, fetch an item, fight, idle...
pub trait Behavior<W>: 'static
where
    W: World,
{
    /// Identifies the concrete behavior type. Two objectives of the same kind are never siblings
    /// unless the kind allows multiple instances.
    fn kind(&self) -> ObjectiveKind;

    /// One tick of real work. Only called while the objective has no live sub-objectives.
    fn act(&mut self, cx: &mut ActContext<'_, W>);

    /// Is the terminal condition satisfied right now? Only called with zero live sub-objectives.
    fn check(&mut self, cx: &mut CheckContext<'_, W>) -> bool;

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Rate at which priority grows while this objective is the focus. `None` uses the
    /// scheduler's base devotion.
    fn devotion(&self) -> Option<f32> {
        None
    }

    /// Effective priority used for arbitration and sibling sorting.
    fn priority(&self, stored: f32, modifier: f32) -> f32 {
        stored * modifier
    }

    fn is_duplicate(&self, this: &Objective<W>, other: &Objective<W>) -> bool {
        this.kind() == other.kind() && this.option() == other.option()
    }

    /// Runs at the top of every `Objective::update`, before priority evolution. Behaviors that
    /// derive priority from outside signals refresh them here.
    fn update(&mut self, _agent: W::Agent, _world: &W, _tick: &TickContext) {}

    fn on_reset(&mut self) {}

    fn on_selected(&mut self, _agent: W::Agent) {}

    fn on_deselected(&mut self, _agent: W::Agent) {}
}
