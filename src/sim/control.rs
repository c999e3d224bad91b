//! Human player control: movement, shooting and slide tackles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::modifiers::Modifiers;
use crate::consts::*;
use crate::direction_and_distance;
use crate::settings::Side;

/// Held-key snapshot for one control slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Kick / slide key (acts on press, not hold)
    pub kick: bool,
    /// Precision (slow walk) modifier
    pub precision: bool,
}

impl SideInput {
    /// Normalized 8-way movement intent, None when idle or cancelled out
    pub fn intent(&self) -> Option<Vec2> {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.try_normalize()
    }
}

/// What a kick press turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shot,
    Slide,
}

/// Whether the ball is close enough to strike with extra `reach`
#[inline]
pub fn ball_in_reach(actor: &Body, ball: &Body, reach: f32) -> bool {
    actor.pos.distance(ball.pos) < actor.radius + ball.radius + reach
}

/// Direction for a slide: intent, else current motion, else straight
/// toward the side's attacking end
pub fn slide_direction(intent: Option<Vec2>, vel: Vec2, side: Side) -> Vec2 {
    intent
        .or_else(|| (vel.length_squared() > 0.01).then(|| vel.normalize()))
        .unwrap_or(Vec2::new(side.attack_dir(), 0.0))
}

/// Commit to a slide tackle along `dir`
pub fn start_slide(actor: &mut Body, dir: Vec2, mods: &Modifiers) {
    actor.vel = dir * mods.slide_impulse();
    actor.slide_timer = SLIDE_DURATION_TICKS;
    actor.slide_cooldown = SLIDE_COOLDOWN_TICKS;
    actor.recovery_timer = mods.recovery_ticks();
}

/// Strike the ball from the actor's position. Replaces the ball velocity.
pub fn shoot(actor: &Body, ball: &mut Body, mods: &Modifiers) {
    let (dir, _) = direction_and_distance(actor.pos, ball.pos);
    ball.vel = dir * KICK_FORCE * mods.kick * KICK_SCALE;
}

/// Resolve a kick press: shoot if the ball is in reach, otherwise slide
/// if allowed. Returns None when nothing happened.
pub fn kick_pressed(
    actor: &mut Body,
    ball: &mut Body,
    intent: Option<Vec2>,
    side: Side,
    mods: &Modifiers,
) -> Option<Action> {
    if ball_in_reach(actor, ball, KICK_REACH) {
        shoot(actor, ball, mods);
        return Some(Action::Shot);
    }
    if actor.can_slide() {
        let dir = slide_direction(intent, actor.vel, side);
        start_slide(actor, dir, mods);
        return Some(Action::Slide);
    }
    None
}

/// Apply one tick of directional acceleration. No-op while sliding.
/// Returns true if the velocity changed.
pub fn apply_movement(actor: &mut Body, intent: Option<Vec2>, precision: bool, mods: &Modifiers) -> bool {
    if actor.is_sliding() {
        return false;
    }
    let Some(dir) = intent else {
        return false;
    };
    let precision_factor = if precision { PRECISION_FACTOR } else { 1.0 };
    actor.vel += dir * PLAYER_SPEED * precision_factor * mods.speed * actor.recovery_factor();
    true
}

/// One tick of human control for a side
pub fn drive_human(
    actor: &mut Body,
    ball: &mut Body,
    input: &SideInput,
    kick_edge: bool,
    side: Side,
    mods: &Modifiers,
) -> Option<Action> {
    let intent = input.intent();
    // Actions first so a fresh slide suppresses this tick's movement
    let action = if kick_edge {
        kick_pressed(actor, ball, intent, side, mods)
    } else {
        None
    };
    apply_movement(actor, intent, input.precision, mods);
    action
}
