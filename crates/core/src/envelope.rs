use crate::types::{ActionId, Tick};

/// A player action tagged with its ordering id and the frame it targets.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionEnvelope<A> {
    pub action_id: ActionId,
    /// Frame the action is applied at, before that frame's simulation step.
    pub intended_tick: Tick,
    pub payload: A,
}

impl<A> ActionEnvelope<A> {
    pub fn new(action_id: ActionId, intended_tick: Tick, payload: A) -> Self {
        Self {
            action_id,
            intended_tick,
            payload,
        }
    }
}
