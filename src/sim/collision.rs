//! Collision detection and response for circles on a walled pitch
//!
//! Pairs are resolved first, then goalposts, then walls and the goal line.
//! Iteration order over the body list is fixed, so a seeded run replays.

use glam::Vec2;
use rand::Rng;

use super::body::Body;
use crate::consts::*;
use crate::in_goal_mouth;
use crate::settings::Side;

/// Force factor for player-player contact
pub const FORCE_PLAIN: f32 = 1.0;
/// Force factor when the ball is one of the pair
pub const FORCE_BALL: f32 = 2.0;
/// Force factor when either body is mid-slide
pub const FORCE_SLIDE: f32 = 3.0;
/// Overlap over-correction for two non-ball bodies
pub const SEPARATION_PLAIN: f32 = 1.05;
/// Overlap over-correction when the ball is involved
pub const SEPARATION_BALL: f32 = 1.15;
/// Largest sideways kick given to a pinched ball
pub const PINCH_NUDGE: f32 = 0.8;
/// How far behind the goal line the net stops players
pub const GOAL_DEPTH: f32 = 50.0;

/// The four posts, top then bottom, left goal first
pub const POSTS: [Vec2; 4] = [
    Vec2::new(PITCH_MARGIN, GOAL_TOP),
    Vec2::new(PITCH_MARGIN, GOAL_BOTTOM),
    Vec2::new(PITCH_WIDTH - PITCH_MARGIN, GOAL_TOP),
    Vec2::new(PITCH_WIDTH - PITCH_MARGIN, GOAL_BOTTOM),
];

/// Result of an overlap check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circles overlap
    pub hit: bool,
    /// Unit normal pointing from the second circle toward the first
    pub normal: Vec2,
    /// Overlap depth
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// What the resolution pass touched, for events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Approaching contacts involving the ball
    pub ball_contacts: u32,
    pub post_hits: u32,
    pub wall_hits: u32,
    /// Side credited with a goal this tick
    pub goal: Option<Side>,
}

/// Overlap test between two circles.
///
/// Coincident centers get an arbitrary +x normal instead of a NaN.
pub fn circle_circle(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = a_pos - b_pos;
    let dist = delta.length();
    let min_dist = a_radius + b_radius;
    if dist >= min_dist {
        return CollisionResult::miss();
    }
    let normal = if dist < MIN_DISTANCE {
        Vec2::X
    } else {
        delta / dist
    };
    CollisionResult {
        hit: true,
        normal,
        penetration: min_dist - dist.max(MIN_DISTANCE),
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Separate two overlapping bodies and exchange momentum.
///
/// Returns the contact result so callers can tell who touched whom.
pub fn resolve_pair(a: &mut Body, b: &mut Body) -> CollisionResult {
    let contact = circle_circle(a.pos, a.radius, b.pos, b.radius);
    if !contact.hit {
        return contact;
    }
    let n = contact.normal;
    let ball_involved = a.is_ball() || b.is_ball();
    let separation = if ball_involved {
        SEPARATION_BALL
    } else {
        SEPARATION_PLAIN
    };

    // Heavier bodies move less
    let total_mass = a.mass + b.mass;
    let overlap = contact.penetration * separation;
    a.pos += n * overlap * (b.mass / total_mass);
    b.pos -= n * overlap * (a.mass / total_mass);

    let approach = (a.vel - b.vel).dot(n);
    if approach < 0.0 {
        let force = if a.is_sliding() || b.is_sliding() {
            FORCE_SLIDE
        } else if ball_involved {
            FORCE_BALL
        } else {
            FORCE_PLAIN
        };
        let impulse = approach * force / total_mass;
        a.vel -= n * impulse * b.mass * a.restitution_scale();
        b.vel += n * impulse * a.mass * b.restitution_scale();
    }
    contact
}

/// Resolve every pair in list order. A ball squeezed between two
/// non-ball bodies gets a random sideways nudge so it cannot stick.
pub fn resolve_bodies<R: Rng>(bodies: &mut [Body], rng: &mut R) -> CollisionReport {
    let mut report = CollisionReport::default();
    // (ball index, normal toward ball) per squeezing body
    let mut pinches: Vec<(usize, Vec2)> = Vec::new();

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (head, tail) = bodies.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            let approaching = (a.vel - b.vel).dot(a.pos - b.pos) < 0.0;
            let contact = resolve_pair(a, b);
            if !contact.hit {
                continue;
            }
            match (a.is_ball(), b.is_ball()) {
                (true, false) => pinches.push((i, contact.normal)),
                (false, true) => pinches.push((j, -contact.normal)),
                _ => {}
            }
            if (a.is_ball() || b.is_ball()) && approaching {
                report.ball_contacts += 1;
            }
        }
    }

    if pinches.len() >= 2 {
        let (ball_idx, normal) = pinches[0];
        let tangent = normal.perp();
        let nudge = rng.random_range(-PINCH_NUDGE..=PINCH_NUDGE);
        bodies[ball_idx].vel += tangent * nudge;
        log::trace!("Ball pinched, nudged {nudge:.2}");
    }

    report
}

/// Bounce the ball off a goalpost. Returns true on an approaching hit.
pub fn resolve_post(ball: &mut Body, post: Vec2) -> bool {
    let contact = circle_circle(ball.pos, ball.radius, post, POST_RADIUS);
    if !contact.hit {
        return false;
    }
    ball.pos += contact.normal * contact.penetration;
    if ball.vel.dot(contact.normal) < 0.0 {
        ball.vel = reflect_velocity(ball.vel, contact.normal) * POST_DAMPING;
        return true;
    }
    false
}

/// Keep a body inside the pitch, open at the goal mouths.
///
/// Only the velocity component pointing into a wall is flipped, scaled by
/// [`BOUNCE`]. Returns true if a wall was touched.
pub fn resolve_boundaries(body: &mut Body) -> bool {
    let r = body.radius;
    let mut hit = false;

    if in_goal_mouth(body.pos.y) {
        // Inside the mouth only the back of the net stops players
        if !body.is_ball() {
            let back_left = PITCH_MARGIN - GOAL_DEPTH;
            let back_right = PITCH_WIDTH - PITCH_MARGIN + GOAL_DEPTH;
            if body.pos.x - r < back_left {
                body.pos.x = back_left + r;
                body.vel.x = body.vel.x.abs() * BOUNCE;
                hit = true;
            } else if body.pos.x + r > back_right {
                body.pos.x = back_right - r;
                body.vel.x = -body.vel.x.abs() * BOUNCE;
                hit = true;
            }
        }
    } else if body.pos.x - r < PITCH_MARGIN {
        body.pos.x = PITCH_MARGIN + r;
        body.vel.x = body.vel.x.abs() * BOUNCE;
        hit = true;
    } else if body.pos.x + r > PITCH_WIDTH - PITCH_MARGIN {
        body.pos.x = PITCH_WIDTH - PITCH_MARGIN - r;
        body.vel.x = -body.vel.x.abs() * BOUNCE;
        hit = true;
    }

    if body.pos.y - r < PITCH_MARGIN {
        body.pos.y = PITCH_MARGIN + r;
        body.vel.y = body.vel.y.abs() * BOUNCE;
        hit = true;
    } else if body.pos.y + r > PITCH_HEIGHT - PITCH_MARGIN {
        body.pos.y = PITCH_HEIGHT - PITCH_MARGIN - r;
        body.vel.y = -body.vel.y.abs() * BOUNCE;
        hit = true;
    }

    hit
}

/// Side that scores if the ball center is over a goal line inside the mouth
pub fn detect_goal(ball_pos: Vec2) -> Option<Side> {
    if !in_goal_mouth(ball_pos.y) {
        return None;
    }
    if ball_pos.x < PITCH_MARGIN {
        // Left goal belongs to home
        Some(Side::Away)
    } else if ball_pos.x > PITCH_WIDTH - PITCH_MARGIN {
        Some(Side::Home)
    } else {
        None
    }
}

/// Full resolution pass for one tick: pairs, posts, walls, goal line
pub fn resolve_all<R: Rng>(bodies: &mut [Body], ball_idx: usize, rng: &mut R) -> CollisionReport {
    let mut report = resolve_bodies(bodies, rng);

    for post in POSTS {
        if resolve_post(&mut bodies[ball_idx], post) {
            report.post_hits += 1;
        }
    }

    for body in bodies.iter_mut() {
        if resolve_boundaries(body) {
            report.wall_hits += 1;
        }
    }

    report.goal = detect_goal(bodies[ball_idx].pos);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ball_at(x: f32, y: f32) -> Body {
        Body::ball(Vec2::new(x, y), 1.0)
    }

    #[test]
    fn test_circle_circle_hit_and_miss() {
        let hit = circle_circle(Vec2::new(10.0, 0.0), 9.0, Vec2::ZERO, 18.0);
        assert!(hit.hit);
        assert!((hit.penetration - 17.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec2::X);

        let miss = circle_circle(Vec2::new(30.0, 0.0), 9.0, Vec2::ZERO, 18.0);
        assert!(!miss.hit);
    }

    #[test]
    fn test_coincident_centers_stay_finite() {
        let mut a = Body::player(Vec2::new(300.0, 300.0), 1.0);
        let mut b = Body::player(Vec2::new(300.0, 300.0), 1.0);
        a.vel = Vec2::new(-1.0, 0.0);
        resolve_pair(&mut a, &mut b);
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!(a.vel.is_finite() && b.vel.is_finite());
        assert!(a.pos.x > b.pos.x);
    }

    #[test]
    fn test_heavier_body_moves_less() {
        let mut keeper = Body::goalkeeper(Vec2::new(100.0, 300.0), 0.0);
        let mut ball = ball_at(120.0, 300.0);
        resolve_pair(&mut ball, &mut keeper);
        let keeper_shift = (keeper.pos.x - 100.0).abs();
        let ball_shift = (ball.pos.x - 120.0).abs();
        assert!(ball_shift > keeper_shift * 10.0);
    }

    #[test]
    fn test_ball_contact_transfers_momentum() {
        let mut player = Body::player(Vec2::new(100.0, 300.0), 1.0);
        let mut ball = ball_at(125.0, 300.0);
        player.vel = Vec2::new(4.0, 0.0);
        resolve_pair(&mut player, &mut ball);
        assert!(ball.vel.x > 0.0);
        assert!(player.vel.x < 4.0);
    }

    #[test]
    fn test_slide_hits_harder() {
        let run = |sliding: bool| {
            let mut a = Body::player(Vec2::new(100.0, 300.0), 1.0);
            let mut b = Body::player(Vec2::new(130.0, 300.0), 1.0);
            a.vel = Vec2::new(5.0, 0.0);
            if sliding {
                a.slide_timer = 5;
            }
            resolve_pair(&mut a, &mut b);
            b.vel.x
        };
        assert!(run(true) > run(false));
    }

    #[test]
    fn test_lower_restitution_softens_response() {
        let run = |restitution: f32| {
            let mut player = Body::player(Vec2::new(100.0, 300.0), 1.0);
            player.restitution = restitution;
            let mut ball = ball_at(125.0, 300.0);
            ball.vel = Vec2::new(-10.0, 0.0);
            resolve_pair(&mut player, &mut ball);
            player.vel.x.abs()
        };
        assert!(run(PLAYER_RESTITUTION * 0.84) < run(PLAYER_RESTITUTION));
    }

    #[test]
    fn test_pinched_ball_gets_nudged() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut bodies = vec![
            Body::player(Vec2::new(480.0, 300.0), 1.0),
            Body::player(Vec2::new(520.0, 300.0), 1.0),
            ball_at(500.0, 300.0),
        ];
        resolve_bodies(&mut bodies, &mut rng);
        // Players separate the ball only along x; any y motion is the nudge
        assert!(bodies[2].vel.y.abs() > 0.0);
        assert!(bodies[2].vel.y.abs() <= PINCH_NUDGE);
    }

    #[test]
    fn test_post_rebound_damped() {
        let post = POSTS[0];
        let mut ball = ball_at(post.x + 15.0, post.y);
        ball.vel = Vec2::new(-10.0, 0.0);
        assert!(resolve_post(&mut ball, post));
        assert!((ball.vel.x - 8.0).abs() < 1e-4);
        assert!(ball.pos.x >= post.x + POST_RADIUS + ball.radius - 1e-3);
    }

    #[test]
    fn test_wall_bounce_outside_mouth() {
        let mut ball = ball_at(PITCH_MARGIN + 5.0, 100.0);
        ball.vel = Vec2::new(-10.0, 0.0);
        assert!(resolve_boundaries(&mut ball));
        assert!((ball.vel.x - 7.0).abs() < 1e-5);
        assert_eq!(ball.pos.x, PITCH_MARGIN + ball.radius);
    }

    #[test]
    fn test_mouth_is_open_for_ball() {
        let mut ball = ball_at(PITCH_MARGIN - 5.0, PITCH_HEIGHT / 2.0);
        ball.vel = Vec2::new(-10.0, 0.0);
        assert!(!resolve_boundaries(&mut ball));
        assert_eq!(ball.vel.x, -10.0);
    }

    #[test]
    fn test_net_stops_players() {
        let mut player = Body::player(Vec2::new(PITCH_MARGIN - GOAL_DEPTH, PITCH_HEIGHT / 2.0), 1.0);
        player.vel = Vec2::new(-3.0, 0.0);
        assert!(resolve_boundaries(&mut player));
        assert!(player.vel.x > 0.0);
    }

    #[test]
    fn test_goal_detection() {
        let mid = PITCH_HEIGHT / 2.0;
        assert_eq!(detect_goal(Vec2::new(PITCH_MARGIN - 1.0, mid)), Some(Side::Away));
        assert_eq!(
            detect_goal(Vec2::new(PITCH_WIDTH - PITCH_MARGIN + 1.0, mid)),
            Some(Side::Home)
        );
        // On the post line is not inside the band
        assert_eq!(detect_goal(Vec2::new(PITCH_MARGIN - 1.0, GOAL_TOP)), None);
        assert_eq!(detect_goal(Vec2::new(PITCH_MARGIN + 1.0, mid)), None);
    }

    proptest! {
        #[test]
        fn prop_wall_bounce_never_amplifies(
            y in (PITCH_MARGIN + 20.0)..(GOAL_TOP - 20.0),
            vx in -40.0f32..-0.1,
            vy in -40.0f32..40.0,
        ) {
            let mut ball = ball_at(PITCH_MARGIN + 2.0, y);
            ball.vel = Vec2::new(vx, vy);
            let before = ball.vel.length();
            resolve_boundaries(&mut ball);
            prop_assert!(ball.vel.length() <= before + 1e-4);
            // The perpendicular part is scaled by the bounce coefficient
            prop_assert!((ball.vel.x - (-vx) * BOUNCE).abs() < 1e-4);
        }

        #[test]
        fn prop_head_on_bounce_scaled(speed in 0.1f32..60.0, y in (PITCH_MARGIN + 20.0)..(GOAL_TOP - 20.0)) {
            let mut ball = ball_at(PITCH_WIDTH - PITCH_MARGIN - 2.0, y);
            ball.vel = Vec2::new(speed, 0.0);
            resolve_boundaries(&mut ball);
            prop_assert!(ball.vel.length() <= speed * BOUNCE + 1e-4);
        }

        #[test]
        fn prop_goal_needs_line_and_band(x in 0.0f32..PITCH_WIDTH, y in 0.0f32..PITCH_HEIGHT) {
            match detect_goal(Vec2::new(x, y)) {
                Some(Side::Away) => prop_assert!(x < PITCH_MARGIN && y > GOAL_TOP && y < GOAL_BOTTOM),
                Some(Side::Home) => prop_assert!(x > PITCH_WIDTH - PITCH_MARGIN && y > GOAL_TOP && y < GOAL_BOTTOM),
                None => {}
            }
        }
    }
}
