use crate::envelope::ActionEnvelope;
use crate::time::FrameDelta;
use crate::types::Tick;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalOutcome {
    Win,
    Lose,
}

pub trait Game: Sized {
    type Config: Clone + Send + Sync + 'static;
    type Action: Clone + Send + Sync + 'static;
    type Observation: Clone + Send + Sync + 'static;
    type Event: Clone + Send + Sync + 'static;

    fn new(config: Self::Config, seed: u64) -> Self;

    /// Upper bound applied to every frame delta handed to `step`.
    fn max_frame_delta(&self) -> f32 {
        FrameDelta::DEFAULT_MAX_SECS
    }

    fn step(
        &mut self,
        tick: Tick,
        dt: FrameDelta,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    );

    fn observe(&self, tick: Tick) -> Self::Observation;

    fn is_terminal(&self) -> Option<TerminalOutcome>;
}
