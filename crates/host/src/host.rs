use sim_core::{ActionEnvelope, ActionId, FrameDelta, Game, TerminalOutcome, Tick};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct RunResult<G: Game> {
    pub outcome: Option<TerminalOutcome>,
    pub final_tick: Tick,
    pub events: Vec<G::Event>,
}

/// Single-threaded frame driver for one game instance.
///
/// Actions are queued per frame and applied, in `ActionId` order, at the start
/// of the frame they are scheduled for. Nothing else touches the game between
/// frames, so the game never needs interior locking.
pub struct MatchHost<G: Game> {
    game: G,
    current_tick: Tick,
    next_action_id: ActionId,
    pending_actions: BTreeMap<Tick, Vec<ActionEnvelope<G::Action>>>,
}

impl<G: Game> MatchHost<G> {
    pub fn new(config: G::Config, seed: u64) -> Self {
        Self {
            game: G::new(config, seed),
            current_tick: 0,
            next_action_id: 0,
            pending_actions: BTreeMap::new(),
        }
    }

    /// Queue `payload` for the next frame. Returns the assigned id and frame.
    pub fn submit(&mut self, payload: G::Action) -> (ActionId, Tick) {
        let action_id = self.next_action_id;
        let tick = self.submit_envelope(ActionEnvelope::new(
            action_id,
            self.current_tick + 1,
            payload,
        ));
        (action_id, tick)
    }

    /// Submit an action to be executed at the given tick.
    /// If `intended_tick` is in the past, schedules for the next tick.
    /// Returns the actual tick the action was scheduled for.
    pub fn submit_envelope(&mut self, mut action: ActionEnvelope<G::Action>) -> Tick {
        let scheduled_tick = if action.intended_tick <= self.current_tick {
            self.current_tick + 1
        } else {
            action.intended_tick
        };

        self.next_action_id = self.next_action_id.max(action.action_id + 1);
        action.intended_tick = scheduled_tick;
        self.pending_actions
            .entry(scheduled_tick)
            .or_default()
            .push(action);

        scheduled_tick
    }

    /// Advance by one frame of `dt` seconds.
    ///
    /// Returns `None` when the game is terminal and no action is waiting for
    /// this frame. A terminal game is still stepped to deliver queued actions
    /// so that a reset can bring it back.
    pub fn step_frame(&mut self, dt: f32) -> Option<Vec<G::Event>> {
        let next_tick = self.current_tick + 1;
        if self.game.is_terminal().is_some() && !self.pending_actions.contains_key(&next_tick) {
            return None;
        }

        self.current_tick = next_tick;

        let mut actions = self
            .pending_actions
            .remove(&self.current_tick)
            .unwrap_or_default();
        actions.sort_by_key(|a| a.action_id);

        let dt = FrameDelta::clamped(dt, self.game.max_frame_delta());
        let mut tick_events = Vec::new();
        self.game
            .step(self.current_tick, dt, &actions, &mut tick_events);

        if let Some(outcome) = self.game.is_terminal() {
            tracing::debug!(tick = self.current_tick, ?outcome, "match reached terminal state");
        }

        Some(tick_events)
    }

    /// Step up to `max_frames` frames of `dt` seconds, stopping early once the
    /// game turns terminal.
    pub fn run_for_frames(&mut self, max_frames: u64, dt: f32) -> RunResult<G> {
        let mut all_events = Vec::new();

        for _ in 0..max_frames {
            match self.step_frame(dt) {
                Some(events) => all_events.extend(events),
                None => break,
            }
            if self.game.is_terminal().is_some() {
                break;
            }
        }

        RunResult {
            outcome: self.game.is_terminal(),
            final_tick: self.current_tick,
            events: all_events,
        }
    }

    /// Step for `secs` of simulated time at a fixed `dt`.
    pub fn run_for_secs(&mut self, secs: f32, dt: f32) -> RunResult<G> {
        let step = FrameDelta::clamped(dt, self.game.max_frame_delta()).secs();
        let frames = if step > 0.0 {
            (secs / step).ceil() as u64
        } else {
            0
        };
        self.run_for_frames(frames, dt)
    }

    pub fn observe(&self) -> G::Observation {
        self.game.observe(self.current_tick)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn is_terminal(&self) -> Option<TerminalOutcome> {
        self.game.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accumulates elapsed time; loses once `limit` seconds have passed.
    #[derive(Clone)]
    struct TimerGame {
        elapsed: f32,
        limit: f32,
        resets: u32,
    }

    #[derive(Clone, Debug)]
    enum TimerAction {
        Reset,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TimerEvent {
        Advanced { tick: Tick, dt: f32 },
        Reset { action_id: ActionId },
    }

    impl Game for TimerGame {
        type Config = f32;
        type Action = TimerAction;
        type Observation = f32;
        type Event = TimerEvent;

        fn new(limit: f32, _seed: u64) -> Self {
            Self {
                elapsed: 0.0,
                limit,
                resets: 0,
            }
        }

        fn step(
            &mut self,
            tick: Tick,
            dt: FrameDelta,
            actions: &[ActionEnvelope<Self::Action>],
            out_events: &mut Vec<Self::Event>,
        ) {
            for action in actions {
                match action.payload {
                    TimerAction::Reset => {
                        self.elapsed = 0.0;
                        self.resets += 1;
                        out_events.push(TimerEvent::Reset {
                            action_id: action.action_id,
                        });
                    }
                }
            }
            if self.is_terminal().is_some() {
                return;
            }
            self.elapsed += dt.secs();
            out_events.push(TimerEvent::Advanced { tick, dt: dt.secs() });
        }

        fn observe(&self, _tick: Tick) -> f32 {
            self.elapsed
        }

        fn is_terminal(&self) -> Option<TerminalOutcome> {
            (self.elapsed >= self.limit).then_some(TerminalOutcome::Lose)
        }
    }

    #[test]
    fn frame_delta_is_clamped_by_host() {
        let mut host = MatchHost::<TimerGame>::new(10.0, 0);
        let events = host.step_frame(5.0).unwrap();
        assert_eq!(
            events,
            vec![TimerEvent::Advanced {
                tick: 1,
                dt: FrameDelta::DEFAULT_MAX_SECS
            }]
        );
    }

    #[test]
    fn run_stops_at_terminal() {
        let mut host = MatchHost::<TimerGame>::new(0.5, 0);
        let result = host.run_for_frames(1_000, 0.05);
        assert_eq!(result.outcome, Some(TerminalOutcome::Lose));
        // 0.05 * 10 reaches 0.5, allowing for float accumulation
        assert!(result.final_tick >= 10 && result.final_tick <= 11);
        assert!(host.step_frame(0.05).is_none());
    }

    #[test]
    fn actions_apply_in_id_order_on_their_frame() {
        let mut host = MatchHost::<TimerGame>::new(10.0, 0);
        host.submit_envelope(ActionEnvelope {
            action_id: 7,
            intended_tick: 3,
            payload: TimerAction::Reset,
        });
        host.submit_envelope(ActionEnvelope {
            action_id: 2,
            intended_tick: 3,
            payload: TimerAction::Reset,
        });

        assert_eq!(host.step_frame(0.01).unwrap().len(), 1);
        assert_eq!(host.step_frame(0.01).unwrap().len(), 1);
        let events = host.step_frame(0.01).unwrap();
        assert_eq!(events[0], TimerEvent::Reset { action_id: 2 });
        assert_eq!(events[1], TimerEvent::Reset { action_id: 7 });
        assert_eq!(host.game().resets, 2);
    }

    #[test]
    fn past_ticks_schedule_for_next_frame() {
        let mut host = MatchHost::<TimerGame>::new(10.0, 0);
        host.run_for_frames(5, 0.01);
        let tick = host.submit_envelope(ActionEnvelope {
            action_id: 0,
            intended_tick: 1,
            payload: TimerAction::Reset,
        });
        assert_eq!(tick, 6);

        let (id, tick) = host.submit(TimerAction::Reset);
        assert_eq!(id, 1);
        assert_eq!(tick, 6);
    }

    #[test]
    fn queued_reset_revives_terminal_game() {
        let mut host = MatchHost::<TimerGame>::new(0.1, 0);
        host.run_for_frames(100, 0.05);
        assert!(host.is_terminal().is_some());

        host.submit(TimerAction::Reset);
        let events = host.step_frame(0.05).unwrap();
        assert!(matches!(events[0], TimerEvent::Reset { .. }));
        assert!(host.is_terminal().is_none());
    }

    #[test]
    fn run_for_secs_counts_frames() {
        let mut host = MatchHost::<TimerGame>::new(100.0, 0);
        let result = host.run_for_secs(1.0, 0.05);
        assert!(result.final_tick == 20 || result.final_tick == 21);
        assert!((host.observe() - 1.0).abs() < 1e-3);
    }
}
