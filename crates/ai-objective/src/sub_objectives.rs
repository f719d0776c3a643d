use crate::observer::{Lifecycle, Listener};
use crate::{Objective, ObjectiveError, ObjectiveId, World};

/// The ordered child list of one objective.
///
/// At most one child per `ObjectiveKind` unless that kind allows multiple instances. Order is
/// insertion order until the owner sorts by priority.
pub struct SubObjectives<W>
where
    W: World,
{
    pub(crate) items: Vec<Objective<W>>,
    /// Mirrors `SchedulerContext::verbose_diagnostics`; refreshed by the owner on every update
    /// and before it acts.
    pub(crate) verbose_diagnostics: bool,
}

impl<W> SubObjectives<W>
where
    W: World,
{
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            verbose_diagnostics: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Objective<W>> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Objective<W>> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[Objective<W>] {
        &self.items
    }

    pub fn first(&self) -> Option<&Objective<W>> {
        self.items.first()
    }

    pub fn first_mut(&mut self) -> Option<&mut Objective<W>> {
        self.items.first_mut()
    }

    pub fn contains(&self, id: ObjectiveId) -> bool {
        self.items.iter().any(|o| o.id() == id)
    }

    pub fn get(&self, id: ObjectiveId) -> Option<&Objective<W>> {
        self.items.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectiveId) -> Option<&mut Objective<W>> {
        self.items.iter_mut().find(|o| o.id() == id)
    }

    /// Append `objective`, replacing any existing child of the same kind.
    pub fn add(&mut self, objective: Objective<W>) {
        let kind = objective.kind();
        self.items.retain(|o| o.kind() != kind);
        self.items.push(objective);
    }

    /// Like `add`, but the new child goes to the front.
    pub fn add_first(&mut self, objective: Objective<W>) {
        let kind = objective.kind();
        self.items.retain(|o| o.kind() != kind);
        self.items.insert(0, objective);
    }

    /// Detach the child cached in `slot` (if still present) and clear the slot.
    pub fn remove(&mut self, slot: &mut Option<ObjectiveId>) -> Option<Objective<W>> {
        let id = slot.take()?;
        self.detach(id)
    }

    /// Move a child out of this list.
    pub fn detach(&mut self, id: ObjectiveId) -> Option<Objective<W>> {
        let index = self.items.iter().position(|o| o.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Lazily create and cache exactly one child.
    ///
    /// - `slot` set but no longer among the children (finished or pruned): the slot is cleared
    ///   and nothing is created.
    /// - `slot` set and still present: nothing is created.
    /// - `slot` empty: `factory` builds the child, the listeners are attached, and the child is
    ///   added (next to same-kind siblings if its kind allows multiple instances, replacing them
    ///   otherwise). Returns `true`.
    ///
    /// An instance that is already a child is refused (`false`). The refusal is logged only when
    /// verbose diagnostics are on.
    pub fn try_add<F>(
        &mut self,
        slot: &mut Option<ObjectiveId>,
        factory: F,
        on_completed: Option<Listener<W::Agent>>,
        on_abandoned: Option<Listener<W::Agent>>,
    ) -> bool
    where
        F: FnOnce() -> Objective<W>,
    {
        if let Some(id) = *slot {
            if !self.contains(id) {
                *slot = None;
            }
            return false;
        }

        let mut objective = factory();
        if self.contains(objective.id()) {
            if self.verbose_diagnostics {
                let err = ObjectiveError::DuplicateInstance { id: objective.id() };
                tracing::warn!(kind = objective.kind().0, "{err}");
            }
            return false;
        }

        if let Some(listener) = on_completed {
            objective
                .observers_mut(Lifecycle::Completed)
                .subscribe_boxed(listener);
        }
        if let Some(listener) = on_abandoned {
            objective
                .observers_mut(Lifecycle::Abandoned)
                .subscribe_boxed(listener);
        }

        *slot = Some(objective.id());
        if objective.capabilities().allows_multiple_instances {
            self.items.push(objective);
        } else {
            self.add(objective);
        }
        true
    }

    pub(crate) fn sort_by_priority(&mut self) {
        self.items
            .sort_by(|a, b| b.arbitration_priority().total_cmp(&a.arbitration_priority()));
    }
}

impl<W> Default for SubObjectives<W>
where
    W: World,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, W> IntoIterator for &'a SubObjectives<W>
where
    W: World,
{
    type Item = &'a Objective<W>;
    type IntoIter = std::slice::Iter<'a, Objective<W>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
