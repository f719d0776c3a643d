use crate::ObjectiveId;

/// Scheduler configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("order priority {0} is outside [0, 100]")]
    OrderPriorityOutOfRange(f32),
    #[error("base devotion must be finite and non-negative, got {0}")]
    InvalidDevotion(f32),
    #[error("initial wait must be finite and non-negative, got {0}")]
    InvalidWait(f32),
}

/// Logic errors in how callers drive the objective tree.
///
/// Inside the tree these are logged and swallowed so the tree stays structurally valid and the
/// operation becomes a no-op. `ObjectiveManager::add_objective` returns them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectiveError {
    #[error("objective {id} is already a sub-objective of this node")]
    DuplicateInstance { id: ObjectiveId },
    #[error("an objective equivalent to {id} is already scheduled")]
    DuplicateObjective { id: ObjectiveId },
}
