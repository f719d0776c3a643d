use crate::AgentId;

/// Whatever the concrete behaviors act upon (navigation, inventory, perception...).
///
/// The objective tree only forwards it: `&W` to checks and priority hooks, `&mut W` to `act`.
pub trait World: 'static {
    type Agent: AgentId;
}
