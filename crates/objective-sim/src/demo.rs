//! A one-dimensional village with a single worker: enough world to exercise sequential
//! sub-objectives, a looping fallback and a pinned order.

use ai_objective::{
    ActContext, Behavior, Capabilities, CheckContext, Objective, ObjectiveId, ObjectiveKind,
    TickContext, World,
};

pub type Agent = u32;

#[derive(Debug, Clone)]
pub struct Village {
    pub position: i32,
    pub item_at: i32,
    pub carrying: bool,
    pub pantry: u32,
    pub patrol_ends: (i32, i32),
}

impl Default for Village {
    fn default() -> Self {
        Self {
            position: 0,
            item_at: 6,
            carrying: false,
            pantry: 0,
            patrol_ends: (-3, 3),
        }
    }
}

impl World for Village {
    type Agent = Agent;
}

/// Walk one step per tick toward `target`. Gives up when it runs out of steps.
pub struct Goto {
    target: i32,
    steps_left: u32,
}

impl Goto {
    pub fn new(target: i32, max_steps: u32) -> Self {
        Self {
            target,
            steps_left: max_steps,
        }
    }
}

impl Behavior<Village> for Goto {
    fn kind(&self) -> ObjectiveKind {
        ObjectiveKind("goto")
    }

    fn act(&mut self, cx: &mut ActContext<'_, Village>) {
        if self.steps_left == 0 {
            tracing::info!(target = self.target, "goto ran out of steps");
            cx.abandon();
            return;
        }
        self.steps_left -= 1;
        cx.world.position += (self.target - cx.world.position).signum();
    }

    fn check(&mut self, cx: &mut CheckContext<'_, Village>) -> bool {
        cx.world.position == self.target
    }
}

/// Bring the item home: go to it, pick it up, come back, drop it in the pantry.
#[derive(Default)]
pub struct Fetch {
    outbound: Option<ObjectiveId>,
    inbound: Option<ObjectiveId>,
    delivered: bool,
}

impl Behavior<Village> for Fetch {
    fn kind(&self) -> ObjectiveKind {
        ObjectiveKind("fetch")
    }

    fn act(&mut self, cx: &mut ActContext<'_, Village>) {
        let agent = cx.agent;
        let world = &mut *cx.world;

        if !world.carrying {
            if world.position == world.item_at {
                world.carrying = true;
                tracing::info!(agent, at = world.position, "picked up item");
                return;
            }
            let target = world.item_at;
            cx.sub_objectives.try_add(
                &mut self.outbound,
                || Objective::new(agent, Goto::new(target, 20), 1.0),
                None,
                None,
            );
        } else if world.position == 0 {
            world.carrying = false;
            world.pantry += 1;
            self.delivered = true;
            tracing::info!(agent, pantry = world.pantry, "delivered item");
        } else {
            cx.sub_objectives.try_add(
                &mut self.inbound,
                || Objective::new(agent, Goto::new(0, 20), 1.0),
                None,
                None,
            );
        }
    }

    fn check(&mut self, _cx: &mut CheckContext<'_, Village>) -> bool {
        self.delivered
    }

    fn on_reset(&mut self) {
        *self = Self::default();
    }

    fn on_selected(&mut self, agent: Agent) {
        tracing::debug!(agent, "fetch resumed");
    }
}

/// Walk back and forth between the patrol ends forever.
pub struct Patrol {
    heading_to_far_end: bool,
}

impl Default for Patrol {
    fn default() -> Self {
        Self {
            heading_to_far_end: true,
        }
    }
}

impl Behavior<Village> for Patrol {
    fn kind(&self) -> ObjectiveKind {
        ObjectiveKind("patrol")
    }

    fn act(&mut self, cx: &mut ActContext<'_, Village>) {
        let (near, far) = cx.world.patrol_ends;
        let target = if self.heading_to_far_end { far } else { near };
        if cx.world.position == target {
            self.heading_to_far_end = !self.heading_to_far_end;
        } else {
            cx.world.position += (target - cx.world.position).signum();
        }
    }

    fn check(&mut self, _cx: &mut CheckContext<'_, Village>) -> bool {
        false
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default().ignores_unsafe_environment(true)
    }

    fn update(&mut self, _agent: Agent, world: &Village, _tick: &TickContext) {
        let (near, far) = world.patrol_ends;
        if world.position <= near {
            self.heading_to_far_end = true;
        } else if world.position >= far {
            self.heading_to_far_end = false;
        }
    }
}

pub fn patrol(agent: Agent) -> Objective<Village> {
    Objective::new(agent, Patrol::default(), 1.0)
        .with_priority(20.0)
        .looping(true)
}

pub fn fetch(agent: Agent) -> Objective<Village> {
    Objective::new(agent, Fetch::default(), 1.0).with_priority(40.0)
}

/// An externally issued order: walk to `target`.
pub fn rally(agent: Agent, target: i32) -> Objective<Village> {
    Objective::new(agent, Goto::new(target, 30), 1.0).with_option("rally")
}
