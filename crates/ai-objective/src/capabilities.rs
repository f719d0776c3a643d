#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed per-behavior flags.
///
/// The scheduler itself reads `abandon_when_subgoals_fail`, `allows_sibling_sorting`,
/// `allows_multiple_instances` and `runs_concurrently_with_children`. The rest are advertised
/// for the agent's controller (steering, equipment, hazard avoidance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Capabilities {
    pub force_run: bool,
    pub ignores_unsafe_environment: bool,
    pub abandon_when_subgoals_fail: bool,
    pub allows_sibling_sorting: bool,
    pub allows_multiple_instances: bool,
    pub runs_concurrently_with_children: bool,
    pub keeps_equipment_on_abandon: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            force_run: false,
            ignores_unsafe_environment: false,
            abandon_when_subgoals_fail: true,
            allows_sibling_sorting: false,
            allows_multiple_instances: false,
            runs_concurrently_with_children: false,
            keeps_equipment_on_abandon: false,
        }
    }
}

impl Capabilities {
    pub const fn force_run(mut self, value: bool) -> Self {
        self.force_run = value;
        self
    }

    pub const fn ignores_unsafe_environment(mut self, value: bool) -> Self {
        self.ignores_unsafe_environment = value;
        self
    }

    pub const fn abandon_when_subgoals_fail(mut self, value: bool) -> Self {
        self.abandon_when_subgoals_fail = value;
        self
    }

    pub const fn sibling_sorting(mut self, value: bool) -> Self {
        self.allows_sibling_sorting = value;
        self
    }

    pub const fn multiple_instances(mut self, value: bool) -> Self {
        self.allows_multiple_instances = value;
        self
    }

    pub const fn concurrent(mut self, value: bool) -> Self {
        self.runs_concurrently_with_children = value;
        self
    }

    pub const fn keeps_equipment_on_abandon(mut self, value: bool) -> Self {
        self.keeps_equipment_on_abandon = value;
        self
    }
}
