//! Asteroid spawning
//!
//! Positions follow the configured `SpawnStrategy`; velocities are never the
//! zero vector.

use glam::Vec2;
use rand::Rng;

use super::physics::nearest_image_shift;
use super::state::Asteroid;
use crate::box_center;
use crate::settings::{BoundaryPolicy, Settings, SpawnStrategy};

/// Placement retries before accepting a spot inside the player clearance
const MAX_SPAWN_ATTEMPTS: u32 = 16;

/// Maximum deviation of an edge spawn's heading from the arena center (radians)
const EDGE_AIM_JITTER: f32 = 0.35;

/// Uniform sample from [lo, hi), or `lo` for an empty range
fn sample<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Velocity with each component uniform in [-max, max), rejecting zero
pub fn random_velocity<R: Rng>(rng: &mut R, max_speed: f32) -> Vec2 {
    let max_speed = max_speed.max(1.0);
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let vel = Vec2::new(
            sample(rng, -max_speed, max_speed),
            sample(rng, -max_speed, max_speed),
        );
        if vel != Vec2::ZERO {
            return vel;
        }
    }
    Vec2::new(max_speed, 0.0)
}

/// Candidate top-left position and velocity for one strategy
fn place<R: Rng>(settings: &Settings, rng: &mut R) -> (Vec2, Vec2) {
    let size = settings.asteroid_size;
    let w = settings.arena_width;
    let h = settings.arena_height;

    match settings.spawn {
        SpawnStrategy::Uniform => {
            let pos = Vec2::new(sample(rng, 0.0, w - size), sample(rng, 0.0, h - size));
            (pos, random_velocity(rng, settings.asteroid_max_speed))
        }
        SpawnStrategy::WrapAware => {
            let pos = Vec2::new(sample(rng, 0.0, w), sample(rng, 0.0, h));
            (pos, random_velocity(rng, settings.asteroid_max_speed))
        }
        SpawnStrategy::Edge => {
            let along_x = sample(rng, 0.0, w - size);
            let along_y = sample(rng, 0.0, h - size);
            let pos = match rng.random_range(0..4u8) {
                0 => Vec2::new(along_x, 0.0),
                1 => Vec2::new(along_x, h - size),
                2 => Vec2::new(0.0, along_y),
                _ => Vec2::new(w - size, along_y),
            };

            let to_center = settings.arena_center() - box_center(pos, size);
            let heading = to_center.normalize_or(Vec2::X);
            let jitter = sample(rng, -EDGE_AIM_JITTER, EDGE_AIM_JITTER);
            let max_speed = settings.asteroid_max_speed.max(1.0);
            let speed = sample(rng, max_speed * 0.5, max_speed);
            (pos, Vec2::from_angle(jitter).rotate(heading) * speed)
        }
    }
}

/// Spawn a full-size asteroid, keeping clear of `avoid` when possible
pub fn spawn_asteroid<R: Rng>(
    id: u32,
    settings: &Settings,
    rng: &mut R,
    avoid: Vec2,
) -> Asteroid {
    let size = settings.asteroid_size;
    let min_dist = settings.spawn_clearance + size / 2.0;

    // Distance to the player, measured across the edges on a wrapping arena
    let clearance = |pos: Vec2| {
        let center = box_center(pos, size);
        let shift = match settings.boundary {
            BoundaryPolicy::Reflect => Vec2::ZERO,
            BoundaryPolicy::Wrap => {
                nearest_image_shift(avoid, center, settings.arena_width, settings.arena_height)
            }
        };
        (center + shift).distance(avoid)
    };

    let (mut pos, mut vel) = place(settings, rng);
    for _ in 1..MAX_SPAWN_ATTEMPTS {
        if clearance(pos) >= min_dist {
            break;
        }
        (pos, vel) = place(settings, rng);
    }

    Asteroid { id, pos, vel, size }
}
