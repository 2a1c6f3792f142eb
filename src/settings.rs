//! Game rules and tuning
//!
//! The arcade variants differ only in a handful of rules (boundary
//! behaviour, collision shape, game-over policy, spawn placement, splitting).
//! Each rule is an independent option here; `Variant` bundles the known
//! combinations.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Known rule bundles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Single life, fast fire, no difficulty ramp
    Classic,
    /// Three hearts, explosions, difficulty ramp, 100-kill victory
    #[default]
    Lives,
    /// Circle collision with asteroids splitting on hard impacts
    Splitting,
    /// Asteroids enter from the edges aimed at the center
    Edge,
    /// Asteroids wrap around the arena instead of bouncing
    Wrap,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::Classic,
        Variant::Lives,
        Variant::Splitting,
        Variant::Edge,
        Variant::Wrap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Lives => "lives",
            Variant::Splitting => "splitting",
            Variant::Edge => "edge",
            Variant::Wrap => "wrap",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "lives" | "hearts" => Some(Variant::Lives),
            "splitting" | "split" => Some(Variant::Splitting),
            "edge" => Some(Variant::Edge),
            "wrap" => Some(Variant::Wrap),
            _ => None,
        }
    }
}

/// What an asteroid does when it reaches the arena edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Negate the outward velocity component and stay inside
    #[default]
    Reflect,
    /// Teleport to the opposite edge
    Wrap,
}

/// Overlap test used by every collision pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionShape {
    /// Axis-aligned bounding boxes
    #[default]
    Aabb,
    /// Circles inscribed in the bounding boxes
    Circle,
}

/// Consequence of the player touching an asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverPolicy {
    /// Lose one life per hit, game over at zero
    Lives { count: u8 },
    /// Any hit ends the run
    Immediate,
}

impl Default for GameOverPolicy {
    fn default() -> Self {
        GameOverPolicy::Lives {
            count: PLAYER_LIVES,
        }
    }
}

impl GameOverPolicy {
    /// Lives the player starts a run with
    pub fn starting_lives(&self) -> u8 {
        match self {
            GameOverPolicy::Lives { count } => *count,
            GameOverPolicy::Immediate => 1,
        }
    }
}

/// Where new asteroids appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpawnStrategy {
    /// Anywhere the asteroid fits, random velocity
    #[default]
    Uniform,
    /// Just inside a random edge, heading for the arena center
    Edge,
    /// Anywhere in the arena, straddling edges allowed
    WrapAware,
}

/// What a bullet hit does to the asteroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
    /// Replace the asteroid with a freshly spawned one
    #[default]
    Respawn,
    /// Destroy the asteroid; the field refills once empty
    Remove,
}

/// Asteroid-to-asteroid collision tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRules {
    /// Relative speed (px/s) above which the slower asteroid breaks apart
    pub speed_threshold: f32,
    /// Asteroids this size or smaller never split
    pub min_size: f32,
    /// Sideways speed given to each fragment, as a fraction of the relative speed
    pub spread: f32,
}

impl Default for SplitRules {
    fn default() -> Self {
        Self {
            speed_threshold: 120.0,
            min_size: 10.0,
            spread: 0.5,
        }
    }
}

/// Startup configuration failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Complete rule set for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    pub player_size: f32,
    /// Movement speed per held direction (px/s)
    pub player_speed: f32,
    /// Player speed gained per difficulty level
    pub player_speed_ramp: f32,

    // === Bullets ===
    pub bullet_size: f32,
    /// Vertical bullet speed (px/s, negative is up)
    pub bullet_speed: f32,
    /// Seconds between shots
    pub bullet_cooldown: f32,
    /// Cooldown removed per difficulty level
    pub bullet_cooldown_ramp: f32,
    pub min_bullet_cooldown: f32,

    // === Asteroids ===
    pub asteroid_size: f32,
    pub asteroid_max_speed: f32,
    pub initial_asteroids: usize,
    /// Asteroid speed multiplier gained per difficulty level
    pub speed_multiplier_ramp: f32,
    /// Radius around the player kept free when spawning
    pub spawn_clearance: f32,

    // === Progression ===
    pub kill_threshold: u32,
    /// Kills that win the run, if any
    pub kill_target: Option<u32>,

    // === Rules ===
    pub boundary: BoundaryPolicy,
    pub collision_shape: CollisionShape,
    pub game_over: GameOverPolicy,
    pub spawn: SpawnStrategy,
    pub on_hit: HitPolicy,
    /// Asteroid-to-asteroid collisions (disabled when absent)
    pub splitting: Option<SplitRules>,
    /// Spawn explosion effects on hits
    pub explosions: bool,

    // === Timing ===
    pub sim_dt: f32,
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_speed_ramp: 10.0,

            bullet_size: BULLET_SIZE,
            bullet_speed: BULLET_SPEED,
            bullet_cooldown: 0.8,
            bullet_cooldown_ramp: 0.05,
            min_bullet_cooldown: 0.1,

            asteroid_size: ASTEROID_SIZE,
            asteroid_max_speed: ASTEROID_MAX_SPEED,
            initial_asteroids: INITIAL_ASTEROIDS,
            speed_multiplier_ramp: 0.1,
            spawn_clearance: 60.0,

            kill_threshold: KILL_THRESHOLD,
            kill_target: Some(100),

            boundary: BoundaryPolicy::Reflect,
            collision_shape: CollisionShape::Aabb,
            game_over: GameOverPolicy::default(),
            spawn: SpawnStrategy::Uniform,
            on_hit: HitPolicy::Respawn,
            splitting: None,
            explosions: true,

            sim_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    /// Rule set for one of the known variants
    pub fn from_variant(variant: Variant) -> Self {
        let base = Self::default();
        match variant {
            Variant::Lives => base,
            Variant::Classic => Self {
                bullet_cooldown: 0.2,
                bullet_cooldown_ramp: 0.0,
                player_speed_ramp: 0.0,
                speed_multiplier_ramp: 0.0,
                kill_target: None,
                game_over: GameOverPolicy::Immediate,
                explosions: false,
                ..base
            },
            Variant::Splitting => Self {
                collision_shape: CollisionShape::Circle,
                splitting: Some(SplitRules::default()),
                ..base
            },
            Variant::Edge => Self {
                collision_shape: CollisionShape::Circle,
                spawn: SpawnStrategy::Edge,
                on_hit: HitPolicy::Remove,
                ..base
            },
            Variant::Wrap => Self {
                boundary: BoundaryPolicy::Wrap,
                spawn: SpawnStrategy::WrapAware,
                ..base
            },
        }
    }

    /// Load settings from a JSON file; absent fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject rule sets the simulation cannot run
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: String| Err(SettingsError::Invalid(msg));

        if !(self.arena_width.is_finite() && self.arena_height.is_finite())
            || self.arena_width <= 0.0
            || self.arena_height <= 0.0
        {
            return invalid(format!(
                "arena must have positive size, got {}x{}",
                self.arena_width, self.arena_height
            ));
        }
        let smallest_side = self.arena_width.min(self.arena_height);
        for (name, size) in [
            ("player_size", self.player_size),
            ("bullet_size", self.bullet_size),
            ("asteroid_size", self.asteroid_size),
        ] {
            if !(size > 0.0 && size < smallest_side) {
                return invalid(format!(
                    "{name} must be positive and smaller than the arena, got {size}"
                ));
            }
        }
        if !(self.asteroid_max_speed > 0.0 && self.asteroid_max_speed.is_finite()) {
            return invalid(format!(
                "asteroid_max_speed must be positive, got {}",
                self.asteroid_max_speed
            ));
        }
        // Bullets only ever leave through the top edge
        if !(self.bullet_speed < 0.0 && self.bullet_speed.is_finite()) {
            return invalid(format!(
                "bullet_speed must be negative (upward), got {}",
                self.bullet_speed
            ));
        }
        if !(self.player_speed.is_finite() && self.player_speed >= 0.0) {
            return invalid(format!(
                "player_speed must not be negative, got {}",
                self.player_speed
            ));
        }
        if self.bullet_cooldown < 0.0 || self.min_bullet_cooldown < 0.0 {
            return invalid("bullet cooldowns must not be negative".to_string());
        }
        if self.kill_threshold == 0 {
            return invalid("kill_threshold must be at least 1".to_string());
        }
        if self.kill_target == Some(0) {
            return invalid("kill_target must be at least 1".to_string());
        }
        if self.game_over.starting_lives() == 0 {
            return invalid("lives policy needs at least one life".to_string());
        }
        if let Some(rules) = &self.splitting {
            if rules.speed_threshold < 0.0 || rules.min_size <= 0.0 || rules.spread <= 0.0 {
                return invalid(format!("split rules out of range: {rules:?}"));
            }
        }
        if !(self.sim_dt > 0.0) || self.max_substeps == 0 {
            return invalid(format!(
                "timestep must be positive with at least one substep, got dt={} substeps={}",
                self.sim_dt, self.max_substeps
            ));
        }
        Ok(())
    }

    /// Center point of the arena
    pub fn arena_center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }
}
