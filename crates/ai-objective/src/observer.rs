use std::collections::BTreeMap;

use crate::{AgentId, ObjectiveId, ObjectiveKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Completed,
    Abandoned,
}

/// Payload handed to lifecycle listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectiveEvent<A: AgentId> {
    pub objective: ObjectiveId,
    pub kind: ObjectiveKind,
    pub agent: A,
    pub lifecycle: Lifecycle,
}

pub type Listener<A> = Box<dyn FnMut(&ObjectiveEvent<A>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Listeners for one lifecycle event of one objective.
///
/// Invoked synchronously, in registration order, at the point the state changes.
pub struct Observers<A: AgentId> {
    next_id: u64,
    listeners: BTreeMap<ListenerId, Listener<A>>,
}

impl<A: AgentId> Observers<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ObjectiveEvent<A>) + 'static) -> ListenerId {
        self.subscribe_boxed(Box::new(listener))
    }

    pub fn subscribe_boxed(&mut self, listener: Listener<A>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, listener);
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify(&mut self, event: &ObjectiveEvent<A>) {
        for listener in self.listeners.values_mut() {
            listener(event);
        }
    }
}

impl<A: AgentId> Default for Observers<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: BTreeMap::new(),
        }
    }
}

impl<A: AgentId> std::fmt::Debug for Observers<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
