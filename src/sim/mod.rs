//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through `tick`
//! - Seeded RNG only
//! - Stable iteration order (collection order, IDs for identity)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod input;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::FixedStep;
pub use collision::{Hitbox, PairOutcome, aabb_overlap, circle_overlap, overlaps, touching};
pub use input::{Key, TickInput, autopilot};
pub use physics::{confine, nearest_image_shift, reflect, wrap, wrap_images};
pub use spawn::spawn_asteroid;
pub use state::{
    Asteroid, Bullet, Difficulty, EndReason, Explosion, GameEvent, GamePhase, GameState, Player,
};
pub use tick::tick;
