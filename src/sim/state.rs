//! Match state and core simulation types
//!
//! `MatchState` is the whole simulation context: every subsystem reads and
//! writes it through `&mut`, nothing lives in globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyKind};
use super::modifiers::{Modifiers, PowerUpItem, PowerUpKind, PowerUpSlots};
use crate::consts::*;
use crate::pitch_center;
use crate::settings::{MatchConfig, Side};

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Players lined up, waiting for the whistle
    Kickoff,
    /// Active gameplay
    Playing,
    /// Celebration pause after a goal
    Goal,
    /// Final whistle (terminal)
    Over,
}

/// Things that happened during a tick, for sound/particles/HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// Whistle, play starts
    KickoffWhistle,
    /// A deliberate shot (human shoot or AI auto-kick)
    Kick { side: Side },
    SlideTackle { side: Side },
    /// Body-on-ball contact during collision resolution
    BallContact,
    WallHit,
    PostHit,
    Goal { scorer: Side, home: u32, away: u32 },
    PowerUpSpawned { kind: PowerUpKind, pos: Vec2 },
    PowerUpCollected { side: Side, kind: PowerUpKind },
    PowerUpExpired { side: Side, kind: PowerUpKind },
    FullTime { home: u32, away: u32 },
}

/// Body list slots. Order is fixed so collision passes are stable.
pub const HOME_PLAYER: usize = 0;
pub const AWAY_PLAYER: usize = 1;
pub const BALL: usize = 2;
pub const HOME_KEEPER: usize = 3;
pub const AWAY_KEEPER: usize = 4;

/// Canonical kickoff spot for a side's field player
pub fn kickoff_spot(side: Side) -> Vec2 {
    let x = match side {
        Side::Home => PITCH_WIDTH / 4.0,
        Side::Away => PITCH_WIDTH * 3.0 / 4.0,
    };
    Vec2::new(x, PITCH_HEIGHT / 2.0)
}

/// Patrol line x for a side's goalkeeper
pub fn keeper_line(side: Side) -> f32 {
    match side {
        Side::Home => PITCH_MARGIN + GOALIE_LINE_OFFSET,
        Side::Away => PITCH_WIDTH - PITCH_MARGIN - GOALIE_LINE_OFFSET,
    }
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub config: MatchConfig,
    /// Seeded RNG for AI rolls, spawns and collision nudges
    pub rng: Pcg32,
    pub phase: MatchPhase,
    /// Ticks left in Kickoff or Goal
    pub phase_ticks: u32,
    /// Goal overlay progress, 0..=1
    pub goal_anim: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Countdown in whole seconds (unused when duration is 0)
    pub seconds_left: u32,
    /// Playing ticks since the countdown last dropped a second
    pub clock_ticks: u32,
    /// Ticks since power-ups last decayed
    pub decay_ticks: u32,
    /// Ticks until the next power-up spawn attempt
    pub spawn_ticks: u32,
    /// Goals by side index
    pub score: [u32; 2],
    /// Players, ball, then goalkeepers (see slot constants)
    pub bodies: Vec<Body>,
    /// Buffs by side index
    pub powerups: [PowerUpSlots; 2],
    /// Pickups on the pitch (sorted by id)
    pub items: Vec<PowerUpItem>,
    /// Kick key state sampled last tick, by control slot
    pub prev_kick: [bool; 2],
    /// Events produced since the host last drained them
    #[serde(skip)]
    pub events: Vec<MatchEvent>,
    next_id: u32,
}

impl MatchState {
    pub fn new(config: MatchConfig) -> Self {
        let weather = config.weather;
        let mut bodies = vec![
            Body::player(kickoff_spot(Side::Home), weather.player_friction()),
            Body::player(kickoff_spot(Side::Away), weather.player_friction()),
            Body::ball(pitch_center(), weather.ball_friction()),
        ];
        if config.goalie_mode {
            bodies.push(Body::goalkeeper(
                Vec2::new(keeper_line(Side::Home), PITCH_HEIGHT / 2.0),
                GOALIE_SPEED,
            ));
            bodies.push(Body::goalkeeper(
                Vec2::new(keeper_line(Side::Away), PITCH_HEIGHT / 2.0),
                -GOALIE_SPEED,
            ));
        }

        log::info!(
            "Match start: {} vs {} ({}, {}, seed {})",
            config.home.name,
            config.away.name,
            config.weather.as_str(),
            config.difficulty.as_str(),
            config.seed
        );

        Self {
            rng: Pcg32::seed_from_u64(config.seed),
            phase: MatchPhase::Kickoff,
            phase_ticks: KICKOFF_TICKS,
            goal_anim: 0.0,
            time_ticks: 0,
            seconds_left: config.duration_secs,
            clock_ticks: 0,
            decay_ticks: 0,
            spawn_ticks: POWERUP_SPAWN_TICKS,
            score: [0, 0],
            bodies,
            powerups: [PowerUpSlots::default(); 2],
            items: Vec::new(),
            prev_kick: [false; 2],
            events: Vec::new(),
            next_id: 1,
            config,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn player_slot(side: Side) -> usize {
        match side {
            Side::Home => HOME_PLAYER,
            Side::Away => AWAY_PLAYER,
        }
    }

    pub fn player(&self, side: Side) -> &Body {
        &self.bodies[Self::player_slot(side)]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Body {
        &mut self.bodies[Self::player_slot(side)]
    }

    pub fn ball(&self) -> &Body {
        &self.bodies[BALL]
    }

    pub fn ball_mut(&mut self) -> &mut Body {
        &mut self.bodies[BALL]
    }

    /// A side's player and the ball, both mutable
    pub fn player_and_ball_mut(&mut self, side: Side) -> (&mut Body, &mut Body) {
        // Both player slots precede the ball
        let (players, rest) = self.bodies.split_at_mut(BALL);
        (&mut players[Self::player_slot(side)], &mut rest[0])
    }

    pub fn score_of(&self, side: Side) -> u32 {
        self.score[side.index()]
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::Over
    }

    /// Both sides' modifiers for this tick
    pub fn side_modifiers(&self) -> [Modifiers; 2] {
        let skill_side = self.config.skill_side();
        Side::BOTH.map(|side| {
            let skills = if skill_side == Some(side) {
                self.config.skills.as_ref()
            } else {
                None
            };
            Modifiers::compute(self.config.weather, &self.powerups[side.index()], skills)
        })
    }

    /// Push size and control modifiers onto the field players
    pub fn apply_body_modifiers(&mut self, mods: &[Modifiers; 2]) {
        for side in Side::BOTH {
            let m = mods[side.index()];
            let player = self.player_mut(side);
            player.radius = PLAYER_RADIUS * m.radius;
            player.restitution = BodyKind::Player.base_restitution() * m.restitution;
        }
    }

    /// Put ball and field players back on their kickoff spots, at rest
    pub fn reset_positions(&mut self) {
        self.ball_mut().reset_to(pitch_center());
        for side in Side::BOTH {
            let player = self.player_mut(side);
            player.reset_to(kickoff_spot(side));
            player.slide_timer = 0;
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }
}
