//! Pitch Rush - arcade soccer match core
//!
//! Core modules:
//! - `sim`: Per-tick simulation (bodies, collisions, actions, AI, match flow)
//! - `session`: Host-facing driver with fixed timestep and completion callback
//! - `settings`: Match configuration handed in by the career layer
//! - `skills`: Career skill tree feeding permanent match modifiers

pub mod session;
pub mod settings;
pub mod sim;
pub mod skills;

pub use session::{FinalScore, MatchSession};
pub use settings::{Difficulty, MatchConfig, Side, TeamInfo, Weather};
pub use skills::{SkillBranch, SkillError, SkillTreeState};

use glam::Vec2;

/// Game configuration constants
///
/// Velocities are in pitch units per tick, timers in ticks.
pub mod consts {
    /// Simulation rate (one tick per rendered frame at 60 Hz)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Pitch dimensions
    pub const PITCH_WIDTH: f32 = 1000.0;
    pub const PITCH_HEIGHT: f32 = 600.0;
    pub const PITCH_MARGIN: f32 = 60.0;
    pub const GOAL_SIZE: f32 = 140.0;
    pub const GOAL_TOP: f32 = (PITCH_HEIGHT - GOAL_SIZE) / 2.0;
    pub const GOAL_BOTTOM: f32 = (PITCH_HEIGHT + GOAL_SIZE) / 2.0;
    pub const POST_RADIUS: f32 = 8.0;
    /// Goalkeepers patrol this far in front of their goal line
    pub const GOALIE_LINE_OFFSET: f32 = 30.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 9.0;
    pub const BALL_MASS: f32 = 1.0;
    pub const BALL_RESTITUTION: f32 = 0.8;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 18.0;
    pub const PLAYER_MASS: f32 = 1.5;
    pub const PLAYER_RESTITUTION: f32 = 0.4;
    /// Acceleration per tick from full movement input
    pub const PLAYER_SPEED: f32 = 0.35;
    pub const PLAYER_MAX_SPEED: f32 = 5.0;
    /// Ball may travel this many times faster than a player
    pub const BALL_SPEED_FACTOR: f32 = 4.0;
    /// Movement factor while the precision key is held
    pub const PRECISION_FACTOR: f32 = 0.35;

    /// Goalkeeper defaults (heavy, frictionless, fixed path)
    pub const GOALIE_MASS: f32 = 50.0;
    pub const GOALIE_RESTITUTION: f32 = 0.5;
    pub const GOALIE_SPEED: f32 = 3.0;

    /// Wall bounce coefficient
    pub const BOUNCE: f32 = 0.7;
    /// Velocity kept after a post rebound
    pub const POST_DAMPING: f32 = 0.8;

    /// Kicking
    pub const KICK_FORCE: f32 = 3.85;
    pub const KICK_SCALE: f32 = 2.5;
    /// Extra reach beyond touching distance for a human kick
    pub const KICK_REACH: f32 = 12.0;
    /// Extra reach for the AI auto-kick
    pub const AI_KICK_REACH: f32 = 10.0;

    /// Slide tackle
    pub const SLIDE_IMPULSE: f32 = 12.0;
    pub const SLIDE_DURATION_TICKS: u32 = 18;
    pub const SLIDE_COOLDOWN_TICKS: u32 = 90;
    pub const RECOVERY_TICKS: u32 = 40;
    pub const RECOVERY_PENALTY: f32 = 0.5;

    /// Match flow
    pub const KICKOFF_TICKS: u32 = 90;
    pub const GOAL_PAUSE_TICKS: u32 = 120;
    pub const GOAL_ANIM_STEP: f32 = 0.015;

    /// Power-ups
    pub const POWERUP_SPAWN_TICKS: u32 = 8 * TICKS_PER_SECOND;
    pub const POWERUP_MAX_ON_FIELD: usize = 2;
    pub const POWERUP_RADIUS: f32 = 20.0;
    pub const POWERUP_DURATION_SECS: u32 = 10;
    /// Spawn keep-out from the pitch margin
    pub const POWERUP_SPAWN_INSET: f32 = 100.0;

    /// Distance floor used when two centers coincide
    pub const MIN_DISTANCE: f32 = 0.001;
}

/// Pitch center point
#[inline]
pub fn pitch_center() -> Vec2 {
    Vec2::new(consts::PITCH_WIDTH / 2.0, consts::PITCH_HEIGHT / 2.0)
}

/// Whether a y coordinate lies strictly inside the goal mouth
#[inline]
pub fn in_goal_mouth(y: f32) -> bool {
    y > consts::GOAL_TOP && y < consts::GOAL_BOTTOM
}

/// Unit vector from `from` toward `to` and the distance between them.
///
/// Coincident points fall back to [`consts::MIN_DISTANCE`] so callers
/// never divide by zero.
#[inline]
pub fn direction_and_distance(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length().max(consts::MIN_DISTANCE);
    (delta / dist, dist)
}
