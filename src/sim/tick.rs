//! Fixed timestep simulation tick
//!
//! Core match loop: sample input, run control and AI, integrate, resolve
//! collisions, then advance the phase machine.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ai::{AiProfile, drive_ai};
use super::body::BodyKind;
use super::collision::resolve_all;
use super::control::{Action, SideInput, drive_human};
use super::modifiers::{Modifiers, PowerUpItem, PowerUpKind};
use super::state::{AWAY_KEEPER, BALL, HOME_KEEPER, MatchEvent, MatchPhase, MatchState, keeper_line};
use crate::consts::*;
use crate::settings::Side;

/// Input for a single tick (held-key snapshots)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Primary device, drives the configured human side
    pub primary: SideInput,
    /// Second device, drives the other side in multiplayer
    pub secondary: SideInput,
    /// Idle/demo mode - AI plays every side
    pub idle_mode: bool,
}

impl TickInput {
    /// Snapshot for a control slot (0 = primary, 1 = secondary)
    fn slot(&self, slot: usize) -> &SideInput {
        if slot == 0 { &self.primary } else { &self.secondary }
    }
}

/// Who moves a side's player this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Controller {
    /// Human, reading the given input slot
    Human(usize),
    Ai,
}

fn controller(state: &MatchState, side: Side, idle_mode: bool) -> Controller {
    let config = &state.config;
    if idle_mode || config.ai_side() == Some(side) {
        Controller::Ai
    } else if side == config.human_side {
        Controller::Human(0)
    } else {
        Controller::Human(1)
    }
}

/// Advance the match by one tick. Ticks after the final whistle are no-ops.
pub fn tick(state: &mut MatchState, input: &TickInput) {
    if state.phase == MatchPhase::Over {
        return;
    }

    state.time_ticks += 1;

    // Kick is a press edge: compare against last tick's snapshot
    let kick_edges = [0, 1].map(|slot| {
        let pressed = input.slot(slot).kick && !state.prev_kick[slot];
        state.prev_kick[slot] = input.slot(slot).kick;
        pressed
    });

    if state.config.goalie_mode {
        patrol_goalkeepers(state);
    }

    match state.phase {
        MatchPhase::Kickoff => {
            state.phase_ticks = state.phase_ticks.saturating_sub(1);
            if state.phase_ticks == 0 {
                state.phase = MatchPhase::Playing;
                state.events.push(MatchEvent::KickoffWhistle);
                log::debug!("Kickoff at tick {}", state.time_ticks);
            }
        }

        MatchPhase::Goal => {
            state.goal_anim = (state.goal_anim + GOAL_ANIM_STEP).min(1.0);
            tick_action_timers(state);
            tick_powerup_decay(state);

            state.phase_ticks = state.phase_ticks.saturating_sub(1);
            if state.phase_ticks == 0 {
                // A goal reaching the target ends the match before the pause
                debug_assert!(!target_reached(state));
                state.reset_positions();
                state.goal_anim = 0.0;
                state.phase = MatchPhase::Kickoff;
                state.phase_ticks = KICKOFF_TICKS;
            }
        }

        MatchPhase::Playing => play_tick(state, input, kick_edges),

        MatchPhase::Over => {}
    }
}

/// Full simulation step while the ball is live
fn play_tick(state: &mut MatchState, input: &TickInput, kick_edges: [bool; 2]) {
    tick_action_timers(state);

    if state.config.fire_mode {
        tick_powerup_spawns(state);
        collect_powerups(state);
    }

    let mods = state.side_modifiers();
    state.apply_body_modifiers(&mods);

    for side in Side::BOTH {
        let action = match controller(state, side, input.idle_mode) {
            Controller::Human(slot) => {
                let m = mods[side.index()];
                let (actor, ball) = state.player_and_ball_mut(side);
                drive_human(actor, ball, input.slot(slot), kick_edges[slot], side, &m)
            }
            Controller::Ai => run_ai(state, side, &mods[side.index()]),
        };
        match action {
            Some(Action::Shot) => state.events.push(MatchEvent::Kick { side }),
            Some(Action::Slide) => state.events.push(MatchEvent::SlideTackle { side }),
            None => {}
        }
    }

    integrate_bodies(state, &mods);

    let report = resolve_all(&mut state.bodies, BALL, &mut state.rng);
    for _ in 0..report.ball_contacts {
        state.events.push(MatchEvent::BallContact);
    }
    for _ in 0..report.post_hits {
        state.events.push(MatchEvent::PostHit);
    }
    if report.wall_hits > 0 {
        state.events.push(MatchEvent::WallHit);
    }

    if let Some(scorer) = report.goal {
        award_goal(state, scorer);
        return;
    }

    tick_powerup_decay(state);
    tick_clock(state);
}

fn run_ai(state: &mut MatchState, side: Side, mods: &Modifiers) -> Option<Action> {
    let profile = AiProfile {
        side,
        difficulty: state.config.difficulty,
        strength: state.config.team(side).strength,
    };
    let tick = state.time_ticks;
    let slot = MatchState::player_slot(side);
    // Players sit before the ball in the body list
    let (players, rest) = state.bodies.split_at_mut(BALL);
    drive_ai(&mut players[slot], &mut rest[0], &profile, mods, tick, &mut state.rng)
}

/// Move every free body and clamp to its speed ceiling
fn integrate_bodies(state: &mut MatchState, mods: &[Modifiers; 2]) {
    let ball_max = PLAYER_MAX_SPEED * BALL_SPEED_FACTOR * state.config.weather.max_speed_factor();
    for (slot, body) in state.bodies.iter_mut().enumerate() {
        let max_speed = match body.kind {
            BodyKind::Ball => ball_max,
            // Keepers are moved by their patrol
            BodyKind::Goalkeeper => continue,
            BodyKind::Player => {
                let m = &mods[slot];
                if body.is_sliding() {
                    m.slide_impulse()
                } else {
                    m.player_max_speed()
                }
            }
        };
        body.integrate(max_speed);
    }
}

/// Walk the keepers up and down their goal mouth at constant speed
fn patrol_goalkeepers(state: &mut MatchState) {
    for (slot, side) in [(HOME_KEEPER, Side::Home), (AWAY_KEEPER, Side::Away)] {
        let Some(keeper) = state.bodies.get_mut(slot) else {
            continue;
        };
        keeper.pos.x = keeper_line(side);
        let dir = if keeper.vel.y < 0.0 { -1.0 } else { 1.0 };
        keeper.vel = Vec2::new(0.0, dir * GOALIE_SPEED);
        keeper.pos.y += keeper.vel.y;
        if keeper.pos.y - keeper.radius < GOAL_TOP {
            keeper.pos.y = GOAL_TOP + keeper.radius;
            keeper.vel.y = GOALIE_SPEED;
        } else if keeper.pos.y + keeper.radius > GOAL_BOTTOM {
            keeper.pos.y = GOAL_BOTTOM - keeper.radius;
            keeper.vel.y = -GOALIE_SPEED;
        }
    }
}

fn tick_action_timers(state: &mut MatchState) {
    for side in Side::BOTH {
        state.player_mut(side).tick_timers();
    }
}

/// Count down the spawn interval and drop a pickup when there is room
fn tick_powerup_spawns(state: &mut MatchState) {
    state.spawn_ticks = state.spawn_ticks.saturating_sub(1);
    if state.spawn_ticks > 0 {
        return;
    }
    state.spawn_ticks = POWERUP_SPAWN_TICKS;
    if state.items.len() >= POWERUP_MAX_ON_FIELD {
        return;
    }

    let inset = PITCH_MARGIN + POWERUP_SPAWN_INSET;
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let pos = Vec2::new(
        state.rng.random_range(inset..PITCH_WIDTH - inset),
        state.rng.random_range(inset..PITCH_HEIGHT - inset),
    );
    let id = state.next_entity_id();
    state.items.push(PowerUpItem {
        id,
        kind,
        pos,
        radius: POWERUP_RADIUS,
    });
    state.events.push(MatchEvent::PowerUpSpawned { kind, pos });
    log::debug!("Power-up {kind:?} spawned at ({:.0}, {:.0})", pos.x, pos.y);
}

/// Hand pickups to whichever player touches them first (home checked first)
fn collect_powerups(state: &mut MatchState) {
    let mut taken: Vec<(Side, u32, PowerUpKind)> = Vec::new();
    for item in &state.items {
        for side in Side::BOTH {
            let player = state.player(side);
            if player.pos.distance(item.pos) < player.radius + item.radius {
                taken.push((side, item.id, item.kind));
                break;
            }
        }
    }

    for (side, id, kind) in taken {
        state.powerups[side.index()].grant(kind);
        state.items.retain(|item| item.id != id);
        state.events.push(MatchEvent::PowerUpCollected { side, kind });
        log::debug!("{side:?} picked up {kind:?}");
    }
}

/// Once per match second, run down active buffs
fn tick_powerup_decay(state: &mut MatchState) {
    state.decay_ticks += 1;
    if state.decay_ticks < TICKS_PER_SECOND {
        return;
    }
    state.decay_ticks = 0;
    for side in Side::BOTH {
        for kind in state.powerups[side.index()].decay_second() {
            state.events.push(MatchEvent::PowerUpExpired { side, kind });
        }
    }
}

/// Match countdown; only runs while playing and only for timed matches
fn tick_clock(state: &mut MatchState) {
    if state.config.duration_secs == 0 {
        return;
    }
    state.clock_ticks += 1;
    if state.clock_ticks < TICKS_PER_SECOND {
        return;
    }
    state.clock_ticks = 0;
    state.seconds_left = state.seconds_left.saturating_sub(1);
    if state.seconds_left == 0 {
        finish(state);
    }
}

fn target_reached(state: &MatchState) -> bool {
    state
        .config
        .target()
        .is_some_and(|target| state.score.iter().any(|&goals| goals >= target))
}

fn award_goal(state: &mut MatchState, scorer: Side) {
    state.score[scorer.index()] += 1;
    let [home, away] = state.score;
    state.events.push(MatchEvent::Goal { scorer, home, away });
    log::info!("Goal for {scorer:?}: {home}-{away}");

    if target_reached(state) {
        finish(state);
    } else {
        state.phase = MatchPhase::Goal;
        state.phase_ticks = GOAL_PAUSE_TICKS;
        state.goal_anim = 0.0;
    }
}

/// Final whistle. Only reachable once: every caller runs in a live phase.
fn finish(state: &mut MatchState) {
    state.phase = MatchPhase::Over;
    let [home, away] = state.score;
    state.events.push(MatchEvent::FullTime { home, away });
    log::info!("Full time: {home}-{away} after {} ticks", state.time_ticks);
}
