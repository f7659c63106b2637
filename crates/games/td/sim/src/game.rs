use crate::actions::{self, TdAction};
use crate::config::TdConfig;
use crate::errors::ConfigError;
use crate::events::TdEvent;
use crate::systems;
use crate::world::TdState;
use sim_core::{ActionEnvelope, FrameDelta, Game, TerminalOutcome, Tick};
use tracing::{error, warn};

pub struct TdGame {
    state: TdState,
    seed: u64,
}

impl TdGame {
    /// Build a match, rejecting an invalid configuration.
    pub fn try_new(config: TdConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            state: TdState::new(config)?,
            seed,
        })
    }

    pub fn state(&self) -> &TdState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TdState {
        &mut self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Game for TdGame {
    type Config = TdConfig;
    type Action = TdAction;
    type Observation = td_types::TdObservation;
    type Event = TdEvent;

    /// Falls back to the default configuration if `config` is invalid.
    /// Use [`TdGame::try_new`] to surface the error instead.
    fn new(config: Self::Config, seed: u64) -> Self {
        match Self::try_new(config, seed) {
            Ok(game) => game,
            Err(err) => {
                error!(%err, "invalid td config, using defaults");
                Self {
                    state: TdState::with_defaults(),
                    seed,
                }
            }
        }
    }

    fn max_frame_delta(&self) -> f32 {
        self.state.config.max_frame_dt
    }

    fn step(
        &mut self,
        _tick: Tick,
        dt: FrameDelta,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        // 1. Player actions, in submission order
        for envelope in actions {
            if let Err(error) = actions::apply(&mut self.state, &envelope.payload, out_events) {
                warn!(action_id = envelope.action_id, action = ?envelope.payload, %error, "action rejected");
                out_events.push(TdEvent::ActionRejected {
                    action_id: envelope.action_id,
                    error,
                });
            }
        }

        // 2. Simulation
        systems::update(&mut self.state, dt, out_events);
    }

    fn observe(&self, tick: Tick) -> Self::Observation {
        crate::observe::build_observation(&self.state, tick)
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        if self.state.game_over {
            return Some(TerminalOutcome::Lose);
        }
        match self.state.config.victory_wave {
            Some(last) if self.state.wave > last => Some(TerminalOutcome::Win),
            _ => None,
        }
    }
}
