//! Weather, power-ups and skill-tree bonuses
//!
//! Everything that scales a side's movement, kicks or body is folded into a
//! single [`Modifiers`] value once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Weather;
use crate::skills::SkillTreeState;

impl Weather {
    /// Movement acceleration factor
    pub fn speed_factor(self) -> f32 {
        match self {
            Weather::Sunny => 1.0,
            Weather::Rain => 0.85,
            Weather::Snow => 1.2,
        }
    }

    /// Per-tick ball velocity decay
    pub fn ball_friction(self) -> f32 {
        match self {
            Weather::Sunny => 0.985,
            Weather::Rain => 0.99,
            Weather::Snow => 0.975,
        }
    }

    /// Per-tick player velocity decay
    pub fn player_friction(self) -> f32 {
        match self {
            Weather::Sunny => 0.93,
            Weather::Rain => 0.94,
            Weather::Snow => 0.96,
        }
    }

    /// Scale on every speed ceiling
    pub fn max_speed_factor(self) -> f32 {
        match self {
            Weather::Sunny | Weather::Snow => 1.0,
            Weather::Rain => 0.85,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Kick,
    Size,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Kick, PowerUpKind::Size];

    /// Multiplier granted while active
    pub fn factor(self) -> f32 {
        match self {
            PowerUpKind::Speed => 1.5,
            PowerUpKind::Kick => 1.8,
            PowerUpKind::Size => 1.2,
        }
    }
}

/// A pickup lying on the pitch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpItem {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
}

/// A buff held by one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining_secs: u32,
}

/// Remaining seconds per power-up kind for one side (0 = inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpSlots {
    pub speed_secs: u32,
    pub kick_secs: u32,
    pub size_secs: u32,
}

impl PowerUpSlots {
    fn slot_mut(&mut self, kind: PowerUpKind) -> &mut u32 {
        match kind {
            PowerUpKind::Speed => &mut self.speed_secs,
            PowerUpKind::Kick => &mut self.kick_secs,
            PowerUpKind::Size => &mut self.size_secs,
        }
    }

    pub fn remaining(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Speed => self.speed_secs,
            PowerUpKind::Kick => self.kick_secs,
            PowerUpKind::Size => self.size_secs,
        }
    }

    #[inline]
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.remaining(kind) > 0
    }

    /// Start or refresh a buff. Same-kind pickups reset the clock.
    pub fn grant(&mut self, kind: PowerUpKind) {
        *self.slot_mut(kind) = POWERUP_DURATION_SECS;
    }

    /// One match second elapsed. Returns kinds that just ran out.
    pub fn decay_second(&mut self) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = self.slot_mut(kind);
            if *slot > 0 {
                *slot -= 1;
                if *slot == 0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }

    /// Buffs currently held, in kind order
    pub fn active(&self) -> Vec<ActivePowerUp> {
        PowerUpKind::ALL
            .into_iter()
            .filter(|&kind| self.is_active(kind))
            .map(|kind| ActivePowerUp {
                kind,
                remaining_secs: self.remaining(kind),
            })
            .collect()
    }

    fn factor(&self, kind: PowerUpKind) -> f32 {
        if self.is_active(kind) { kind.factor() } else { 1.0 }
    }
}

/// Speed and shoot bonus per level
const SKILL_BOOST: [f32; 6] = [1.0, 1.02, 1.04, 1.07, 1.11, 1.16];
/// Restitution scale per control level
const CONTROL_DAMPING: [f32; 6] = [1.0, 0.98, 0.96, 0.93, 0.89, 0.84];

#[inline]
fn table(values: &[f32; 6], level: u8) -> f32 {
    values[usize::from(level).min(values.len() - 1)]
}

/// Movement multiplier for a speed level
pub fn skill_speed_factor(level: u8) -> f32 {
    table(&SKILL_BOOST, level)
}

/// Kick multiplier for a shoot level
pub fn skill_shoot_factor(level: u8) -> f32 {
    table(&SKILL_BOOST, level)
}

/// Restitution multiplier for a control level
pub fn skill_control_factor(level: u8) -> f32 {
    table(&CONTROL_DAMPING, level)
}

/// Slide impulse multiplier for a defense level
pub fn skill_slide_factor(level: u8) -> f32 {
    let mut factor = 1.0;
    for threshold in [1, 3, 5] {
        if level >= threshold {
            factor += 0.05;
        }
    }
    factor
}

/// Recovery duration multiplier for a defense level
pub fn skill_recovery_factor(level: u8) -> f32 {
    let mut factor = 1.0;
    if level >= 2 {
        factor -= 0.05;
    }
    if level >= 4 {
        factor -= 0.10;
    }
    factor
}

/// Every multiplier acting on one side this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifiers {
    /// Movement acceleration (power-up × skill × weather)
    pub speed: f32,
    /// Player speed ceiling (power-up × skill × weather ceiling)
    pub max_speed: f32,
    /// Kick force (power-up × skill)
    pub kick: f32,
    /// Collision radius
    pub radius: f32,
    /// Restitution scale from control skill
    pub restitution: f32,
    /// Slide impulse scale from defense skill
    pub slide: f32,
    /// Recovery duration scale from defense skill
    pub recovery: f32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_speed: 1.0,
            kick: 1.0,
            radius: 1.0,
            restitution: 1.0,
            slide: 1.0,
            recovery: 1.0,
        }
    }
}

impl Modifiers {
    /// Fold weather, power-ups and (optionally) career skills together
    pub fn compute(weather: Weather, powerups: &PowerUpSlots, skills: Option<&SkillTreeState>) -> Self {
        let speed_buff = powerups.factor(PowerUpKind::Speed);
        let mut mods = Self {
            speed: speed_buff * weather.speed_factor(),
            max_speed: speed_buff * weather.max_speed_factor(),
            kick: powerups.factor(PowerUpKind::Kick),
            radius: powerups.factor(PowerUpKind::Size),
            ..Self::default()
        };

        if let Some(tree) = skills {
            let levels = &tree.levels;
            let speed = skill_speed_factor(levels.speed);
            mods.speed *= speed;
            mods.max_speed *= speed;
            mods.kick *= skill_shoot_factor(levels.shoot);
            mods.restitution = skill_control_factor(levels.control);
            mods.slide = skill_slide_factor(levels.defense);
            mods.recovery = skill_recovery_factor(levels.defense);
        }

        mods
    }

    /// Speed ceiling for a player of this side
    #[inline]
    pub fn player_max_speed(&self) -> f32 {
        PLAYER_MAX_SPEED * self.max_speed
    }

    /// Slide impulse magnitude for this side
    #[inline]
    pub fn slide_impulse(&self) -> f32 {
        SLIDE_IMPULSE * self.slide
    }

    /// Recovery ticks after a slide
    #[inline]
    pub fn recovery_ticks(&self) -> u32 {
        (RECOVERY_TICKS as f32 * self.recovery).round() as u32
    }
}
