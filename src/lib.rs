//! Asteroid Shooter - A 2D arena arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (input, physics, collisions, spawning, game state)
//! - `settings`: Rule variants and tuning, loadable from JSON
//! - `atlas`: Sprite sheet source rectangles and HUD layout for an external renderer

pub mod atlas;
pub mod settings;
pub mod sim;

pub use settings::{
    BoundaryPolicy, CollisionShape, GameOverPolicy, HitPolicy, Settings, SettingsError,
    SpawnStrategy, SplitRules, Variant,
};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 120.0;
    pub const PLAYER_LIVES: u8 = 3;

    /// Bullet defaults (negative speed travels toward the top edge)
    pub const BULLET_SIZE: f32 = 10.0;
    pub const BULLET_SPEED: f32 = -300.0;

    /// Asteroid defaults
    pub const ASTEROID_SIZE: f32 = 30.0;
    /// Spawned velocity components are drawn from [-max, max)
    pub const ASTEROID_MAX_SPEED: f32 = 100.0;
    pub const INITIAL_ASTEROIDS: usize = 5;

    /// Kills between difficulty raises / bonus spawns
    pub const KILL_THRESHOLD: u32 = 10;

    /// Explosion animation
    pub const EXPLOSION_FRAMES: u32 = 6;
    pub const EXPLOSION_FRAME_SECS: f32 = 0.1;
}

/// Center of an axis-aligned square whose top-left corner is `pos`
#[inline]
pub fn box_center(pos: Vec2, size: f32) -> Vec2 {
    pos + Vec2::splat(size / 2.0)
}

/// Inverse of [`box_center`]
#[inline]
pub fn box_origin(center: Vec2, size: f32) -> Vec2 {
    center - Vec2::splat(size / 2.0)
}
