use core::fmt::Debug;

/// Opaque handle for the agent that owns an objective tree.
///
/// The scheduler never looks inside the agent. It only threads the handle through to behaviors,
/// lifecycle events and trace records, so all it needs is a stable numeric id for logs.
pub trait AgentId: Copy + Ord + Eq + Debug + 'static {
    fn stable_id(self) -> u64;
}

macro_rules! integer_agent_id {
    ($($ty:ty),*) => {
        $(
            impl AgentId for $ty {
                fn stable_id(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

integer_agent_id!(u16, u32, u64, usize);
