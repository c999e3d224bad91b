//! Host-facing match driver
//!
//! Wraps [`MatchState`] with a fixed-timestep accumulator so a host can feed
//! it wall-clock frame deltas, and delivers the final score exactly once.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::{MatchConfig, Side};
use crate::sim::{MatchEvent, MatchState, TickInput, tick};

/// Final result handed to the host when the match ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub home: u32,
    pub away: u32,
}

/// Longest frame delta accepted before the substep cap applies
const MAX_FRAME_DT: f32 = 0.25;

type CompletionCallback = Box<dyn FnOnce(FinalScore)>;

/// A running match
pub struct MatchSession {
    state: MatchState,
    accumulator: f32,
    input: TickInput,
    /// Taken on the first Over tick
    on_complete: Option<CompletionCallback>,
}

impl MatchSession {
    pub fn new(config: MatchConfig, on_complete: impl FnOnce(FinalScore) + 'static) -> Self {
        Self {
            state: MatchState::new(config),
            accumulator: 0.0,
            input: TickInput::default(),
            on_complete: Some(Box::new(on_complete)),
        }
    }

    /// Replace the held input; it stays in effect until the next call
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Run as many whole ticks as `frame_dt` seconds cover (capped per frame).
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        // A NaN would poison the accumulator for good
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog we refused to simulate so the next frame starts fresh
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Run exactly one tick with the held input
    pub fn step(&mut self) {
        tick(&mut self.state, &self.input);
        if self.state.is_over() {
            self.complete();
        }
    }

    fn complete(&mut self) {
        if let Some(callback) = self.on_complete.take() {
            let result = self.final_score();
            log::debug!("Delivering final score {}-{}", result.home, result.away);
            callback(result);
        }
    }

    pub fn final_score(&self) -> FinalScore {
        FinalScore {
            home: self.state.score_of(Side::Home),
            away: self.state.score_of(Side::Away),
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        self.state.drain_events()
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MatchPhase;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<FinalScore>>>, impl FnOnce(FinalScore) + 'static) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        (calls, move |score| sink.borrow_mut().push(score))
    }

    #[test]
    fn test_substep_cap() {
        let (_, callback) = recorder();
        let mut session = MatchSession::new(MatchConfig::default(), callback);
        assert_eq!(session.advance(0.0), 0);
        // A huge stall is clamped and capped
        assert_eq!(session.advance(5.0), MAX_SUBSTEPS);
        assert_eq!(session.state().time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_non_finite_frames_are_ignored() {
        let (_, callback) = recorder();
        let mut session = MatchSession::new(MatchConfig::default(), callback);
        assert_eq!(session.advance(f32::NAN), 0);
        assert_eq!(session.advance(f32::INFINITY), 0);
        assert_eq!(session.advance(-1.0), 0);
        // Still ticking afterwards
        assert_eq!(session.advance(SIM_DT * 2.5), 2);
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let (_, callback) = recorder();
        let mut session = MatchSession::new(MatchConfig::default(), callback);
        let mut ticks = 0;
        for _ in 0..10 {
            ticks += session.advance(SIM_DT * 0.5);
        }
        assert!((4..=5).contains(&ticks));
    }

    #[test]
    fn test_callback_fires_once() {
        let (calls, callback) = recorder();
        let config = MatchConfig {
            duration_secs: 2,
            multiplayer: true,
            ..Default::default()
        };
        let mut session = MatchSession::new(config, callback);
        while !session.is_over() {
            session.step();
        }
        for _ in 0..50 {
            session.advance(1.0 / 60.0);
        }
        assert_eq!(session.state().phase, MatchPhase::Over);
        assert_eq!(*calls.borrow(), vec![FinalScore { home: 0, away: 0 }]);
    }

    #[test]
    fn test_held_input_and_events() {
        let (_, callback) = recorder();
        let mut session = MatchSession::new(MatchConfig::default(), callback);
        session.set_input(TickInput {
            idle_mode: true,
            ..Default::default()
        });
        for _ in 0..KICKOFF_TICKS {
            session.step();
        }
        let events = session.drain_events();
        assert!(events.contains(&MatchEvent::KickoffWhistle));
        assert!(session.drain_events().is_empty());
    }
}
