//! Circular rigid bodies
//!
//! Ball, field players and goalkeepers share one representation. Only
//! translation is simulated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What a body is, for speed ceilings and collision rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Ball,
    Player,
    Goalkeeper,
}

impl BodyKind {
    /// Restitution a body of this kind starts with
    pub fn base_restitution(self) -> f32 {
        match self {
            BodyKind::Ball => BALL_RESTITUTION,
            BodyKind::Player => PLAYER_RESTITUTION,
            BodyKind::Goalkeeper => GOALIE_RESTITUTION,
        }
    }
}

/// A moving circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub kind: BodyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub restitution: f32,
    /// Per-tick velocity decay factor
    pub friction: f32,
    /// Ticks left in the current slide tackle
    #[serde(default)]
    pub slide_timer: u32,
    /// Ticks until another slide is allowed
    #[serde(default)]
    pub slide_cooldown: u32,
    /// Ticks of slowed movement after a slide
    #[serde(default)]
    pub recovery_timer: u32,
}

impl Body {
    pub fn ball(pos: Vec2, friction: f32) -> Self {
        Self {
            kind: BodyKind::Ball,
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            mass: BALL_MASS,
            restitution: BALL_RESTITUTION,
            friction,
            slide_timer: 0,
            slide_cooldown: 0,
            recovery_timer: 0,
        }
    }

    pub fn player(pos: Vec2, friction: f32) -> Self {
        Self {
            kind: BodyKind::Player,
            radius: PLAYER_RADIUS,
            mass: PLAYER_MASS,
            restitution: PLAYER_RESTITUTION,
            ..Self::ball(pos, friction)
        }
    }

    /// Goalkeepers patrol vertically at constant speed and never slow down
    pub fn goalkeeper(pos: Vec2, vel_y: f32) -> Self {
        Self {
            kind: BodyKind::Goalkeeper,
            vel: Vec2::new(0.0, vel_y),
            radius: PLAYER_RADIUS,
            mass: GOALIE_MASS,
            restitution: GOALIE_RESTITUTION,
            friction: 1.0,
            ..Self::ball(pos, 1.0)
        }
    }

    #[inline]
    pub fn is_ball(&self) -> bool {
        self.kind == BodyKind::Ball
    }

    #[inline]
    pub fn is_sliding(&self) -> bool {
        self.slide_timer > 0
    }

    /// Slide allowed right now
    #[inline]
    pub fn can_slide(&self) -> bool {
        self.slide_timer == 0 && self.slide_cooldown == 0
    }

    /// Recovery penalty factor for movement
    #[inline]
    pub fn recovery_factor(&self) -> f32 {
        if self.recovery_timer > 0 {
            RECOVERY_PENALTY
        } else {
            1.0
        }
    }

    /// Current restitution relative to the kind's default
    #[inline]
    pub fn restitution_scale(&self) -> f32 {
        self.restitution / self.kind.base_restitution()
    }

    /// Place at rest at a position
    pub fn reset_to(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
    }

    /// Count down action timers by one tick.
    ///
    /// Recovery only starts draining once the slide itself is over.
    pub fn tick_timers(&mut self) {
        self.slide_cooldown = self.slide_cooldown.saturating_sub(1);
        if self.slide_timer > 0 {
            self.slide_timer -= 1;
        } else {
            self.recovery_timer = self.recovery_timer.saturating_sub(1);
        }
    }

    /// Advance one tick: move, decay, clamp to `max_speed`
    pub fn integrate(&mut self, max_speed: f32) {
        self.pos += self.vel;
        self.vel *= self.friction;
        self.vel = self.vel.clamp_length_max(max_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_moves_then_decays() {
        let mut body = Body::ball(Vec2::new(100.0, 100.0), 0.5);
        body.vel = Vec2::new(4.0, 0.0);
        body.integrate(100.0);
        assert_eq!(body.pos, Vec2::new(104.0, 100.0));
        assert!((body.vel.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_integrate_clamps_speed() {
        let mut body = Body::player(Vec2::ZERO, 1.0);
        body.vel = Vec2::new(30.0, 40.0);
        body.integrate(5.0);
        assert!((body.vel.length() - 5.0).abs() < 1e-4);
        // Direction preserved
        assert!((body.vel.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-4);
    }

    #[test]
    fn test_recovery_waits_for_slide_end() {
        let mut body = Body::player(Vec2::ZERO, 0.93);
        body.slide_timer = 2;
        body.slide_cooldown = 5;
        body.recovery_timer = 3;

        body.tick_timers();
        body.tick_timers();
        assert_eq!(body.slide_timer, 0);
        assert_eq!(body.recovery_timer, 3);
        assert_eq!(body.slide_cooldown, 3);
        assert!(!body.can_slide());

        body.tick_timers();
        assert_eq!(body.recovery_timer, 2);
        assert!((body.recovery_factor() - RECOVERY_PENALTY).abs() < 1e-6);
    }

    #[test]
    fn test_goalkeeper_keeps_speed() {
        let mut keeper = Body::goalkeeper(Vec2::new(90.0, 300.0), GOALIE_SPEED);
        keeper.integrate(PLAYER_MAX_SPEED);
        assert!((keeper.vel.y - GOALIE_SPEED).abs() < 1e-6);
        assert!((keeper.pos.y - 303.0).abs() < 1e-4);
    }
}
