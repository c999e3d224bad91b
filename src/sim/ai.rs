//! Opponent AI
//!
//! Purely reactive: every tick picks a target point, accelerates toward it,
//! and rolls for kicks and (on Hard) slide tackles. Nothing carries over
//! between ticks except what lives on the bodies.

use glam::Vec2;
use rand::Rng;

use super::body::Body;
use super::control::{Action, ball_in_reach, start_slide};
use super::modifiers::Modifiers;
use crate::consts::*;
use crate::settings::{Difficulty, Side};
use crate::{direction_and_distance, pitch_center};

/// Ball this close to a side line and an end line counts as cornered
pub const CORNER_ZONE: f32 = 40.0;
/// AI this close to its target escapes a cornered ball
pub const CORNER_ESCAPE_RANGE: f32 = 50.0;
/// Normal AI blend toward the offensive point
pub const NORMAL_BIAS: f32 = 0.6;
/// Normal AI drops to plain ball-chasing for this many ticks...
pub const CHASE_WINDOW_TICKS: u64 = 30;
/// ...out of every this many
pub const CHASE_PERIOD_TICKS: u64 = 180;
/// Close enough; stop accelerating
pub const ARRIVE_DISTANCE: f32 = 5.0;
/// Hard AI slide roll per tick
pub const SLIDE_CHANCE: f64 = 0.02;
pub const SLIDE_MIN_RANGE: f32 = 60.0;
pub const SLIDE_MAX_RANGE: f32 = 150.0;

impl Difficulty {
    /// Speed multiplier
    pub fn speed_factor(self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.2,
        }
    }

    /// Chance per tick in reach to strike the ball
    pub fn kick_chance(self) -> f64 {
        match self {
            Difficulty::Easy => 0.10,
            Difficulty::Normal => 0.25,
            Difficulty::Hard => 0.50,
        }
    }

    /// Velocity added to the ball by an auto-kick
    pub fn kick_power(self) -> f32 {
        match self {
            Difficulty::Easy => 2.0,
            Difficulty::Normal => 3.0,
            Difficulty::Hard => 4.0,
        }
    }

    /// Distance kept behind the ball when lining up an attack
    pub fn offensive_offset(self) -> f32 {
        match self {
            Difficulty::Easy => 0.0,
            Difficulty::Normal => 60.0,
            Difficulty::Hard => 40.0,
        }
    }
}

/// Center of the goal a side attacks
pub fn attacking_goal(side: Side) -> Vec2 {
    let x = match side {
        Side::Home => PITCH_WIDTH - PITCH_MARGIN,
        Side::Away => PITCH_MARGIN,
    };
    Vec2::new(x, PITCH_HEIGHT / 2.0)
}

/// Per-tick acceleration for an AI player. Strength is rated 0-100.
pub fn ai_speed(strength: u8, difficulty: Difficulty, mods: &Modifiers, actor: &Body) -> f32 {
    let strength_factor = 0.5 + f32::from(strength.min(100)) / 200.0;
    PLAYER_SPEED * strength_factor * difficulty.speed_factor() * mods.speed * actor.recovery_factor()
}

/// Ball within the corner zone of both an end line and a side line
pub fn is_ball_in_corner(ball: Vec2) -> bool {
    let near_end = ball.x < PITCH_MARGIN + CORNER_ZONE || ball.x > PITCH_WIDTH - PITCH_MARGIN - CORNER_ZONE;
    let near_side = ball.y < PITCH_MARGIN + CORNER_ZONE || ball.y > PITCH_HEIGHT - PITCH_MARGIN - CORNER_ZONE;
    near_end && near_side
}

/// Point the AI should run toward this tick
pub fn choose_target(difficulty: Difficulty, side: Side, ball: Vec2, ai_pos: Vec2, tick: u64) -> Vec2 {
    let mut target = ball;

    if difficulty != Difficulty::Easy {
        // Stand behind the ball, looking at the goal being attacked
        let (to_goal, _) = direction_and_distance(ball, attacking_goal(side));
        let offensive = ball - to_goal * difficulty.offensive_offset();

        target = if difficulty == Difficulty::Hard {
            offensive
        } else if tick % CHASE_PERIOD_TICKS < CHASE_WINDOW_TICKS {
            // Periodic plain chase breaks orbiting loops
            ball
        } else {
            ball * (1.0 - NORMAL_BIAS) + offensive * NORMAL_BIAS
        };
    }

    if difficulty != Difficulty::Hard
        && is_ball_in_corner(ball)
        && ai_pos.distance(target) < CORNER_ESCAPE_RANGE
    {
        let (to_center, _) = direction_and_distance(ai_pos, pitch_center());
        target = ai_pos + to_center * CORNER_ESCAPE_RANGE;
    }

    target
}

/// Everything the AI needs to know about its side
#[derive(Debug, Clone, Copy)]
pub struct AiProfile {
    pub side: Side,
    pub difficulty: Difficulty,
    pub strength: u8,
}

/// One AI tick for a side's player. Returns the action taken, if any.
pub fn drive_ai<R: Rng>(
    actor: &mut Body,
    ball: &mut Body,
    profile: &AiProfile,
    mods: &Modifiers,
    tick: u64,
    rng: &mut R,
) -> Option<Action> {
    let (to_ball, ball_dist) = direction_and_distance(actor.pos, ball.pos);

    if profile.difficulty == Difficulty::Hard
        && actor.can_slide()
        && ball_dist > SLIDE_MIN_RANGE
        && ball_dist < SLIDE_MAX_RANGE
        && rng.random_bool(SLIDE_CHANCE)
    {
        start_slide(actor, to_ball, mods);
        return Some(Action::Slide);
    }

    if !actor.is_sliding() {
        let target = choose_target(profile.difficulty, profile.side, ball.pos, actor.pos, tick);
        let (dir, dist) = direction_and_distance(actor.pos, target);
        if dist > ARRIVE_DISTANCE {
            actor.vel += dir * ai_speed(profile.strength, profile.difficulty, mods, actor);
        }
    }

    if ball_in_reach(actor, ball, AI_KICK_REACH) && rng.random_bool(profile.difficulty.kick_chance()) {
        let (dir, _) = direction_and_distance(actor.pos, ball.pos);
        ball.vel += dir * profile.difficulty.kick_power() * mods.kick;
        return Some(Action::Shot);
    }

    None
}
