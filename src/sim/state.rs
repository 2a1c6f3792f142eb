//! Game state and core simulation types
//!
//! Everything the tick pipeline reads or mutates lives in `GameState`; there
//! is no other mutable state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::spawn_asteroid;
use crate::{box_center, box_origin};
use crate::consts::{EXPLOSION_FRAMES, EXPLOSION_FRAME_SECS};
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended; only a reset leaves this phase
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Last life lost
    OutOfLives,
    /// Hit an asteroid under the immediate game-over policy
    Collision,
    /// Reached the configured kill target
    KillTarget,
}

/// Something that happened during the last tick (for audio, HUD and logs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BulletFired,
    AsteroidDestroyed { kills: u32 },
    DifficultyRaised { level: u32 },
    AsteroidSplit { id: u32 },
    PlayerHit { lives: u8 },
    FieldRefilled { count: usize },
    GameOver { reason: EndReason },
    Reset,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// A bullet left the ship this tick (selects the firing sprite)
    pub firing: bool,
}

impl Player {
    /// Player parked at the arena center, not moving
    pub fn centered(settings: &Settings) -> Self {
        Self {
            pos: box_origin(settings.arena_center(), settings.player_size),
            vel: Vec2::ZERO,
            size: settings.player_size,
            firing: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        box_center(self.pos, self.size)
    }
}

/// A drifting asteroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

impl Asteroid {
    pub fn center(&self) -> Vec2 {
        box_center(self.pos, self.size)
    }
}

/// A bullet travelling vertically
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Vertical speed (px/s, negative is up)
    pub speed: f32,
    pub size: f32,
}

/// A short explosion animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub frame: u32,
    /// Seconds spent on the current frame
    pub frame_time: f32,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            frame: 0,
            frame_time: 0.0,
        }
    }

    /// Advance the animation; returns false once the last frame has played
    pub fn advance(&mut self, dt: f32) -> bool {
        self.frame_time += dt;
        while self.frame_time >= EXPLOSION_FRAME_SECS && self.frame < EXPLOSION_FRAMES {
            self.frame_time -= EXPLOSION_FRAME_SECS;
            self.frame += 1;
        }
        self.frame < EXPLOSION_FRAMES
    }
}

/// Difficulty ramp, raised every `kill_threshold` kills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub level: u32,
    /// Scales asteroid velocity during movement
    pub speed_multiplier: f32,
    /// Seconds between shots
    pub bullet_cooldown: f32,
    /// Player movement speed (px/s)
    pub player_speed: f32,
}

impl Difficulty {
    pub fn initial(settings: &Settings) -> Self {
        Self {
            level: 0,
            speed_multiplier: 1.0,
            bullet_cooldown: settings.bullet_cooldown,
            player_speed: settings.player_speed,
        }
    }

    /// Step up one level
    pub fn raise(&mut self, settings: &Settings) {
        self.level += 1;
        self.speed_multiplier += settings.speed_multiplier_ramp;
        let floor = settings.min_bullet_cooldown.min(self.bullet_cooldown);
        self.bullet_cooldown = (self.bullet_cooldown - settings.bullet_cooldown_ramp).max(floor);
        self.player_speed += settings.player_speed_ramp;
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Rules for this run
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawner randomness
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Set when the phase becomes GameOver
    pub end_reason: Option<EndReason>,
    /// Player lives
    pub lives: u8,
    /// Asteroids destroyed by bullets this run
    pub kills: u32,
    pub difficulty: Difficulty,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds since the run started
    pub time_secs: f64,
    /// Simulated time of the last shot
    pub last_shot: Option<f64>,
    pub player: Player,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given rules and seed
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut state = Self {
            lives: settings.game_over.starting_lives(),
            difficulty: Difficulty::initial(&settings),
            player: Player::centered(&settings),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            end_reason: None,
            kills: 0,
            time_ticks: 0,
            time_secs: 0.0,
            last_shot: None,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            settings,
        };

        let count = state.settings.initial_asteroids;
        state.spawn_asteroids(count);

        state
    }

    /// Return to a fresh run, keeping the rules and the RNG stream
    pub fn reset(&mut self) {
        self.player = Player::centered(&self.settings);
        self.bullets.clear();
        self.asteroids.clear();
        self.explosions.clear();
        self.kills = 0;
        self.difficulty = Difficulty::initial(&self.settings);
        self.lives = self.settings.game_over.starting_lives();
        self.phase = GamePhase::Playing;
        self.end_reason = None;
        self.time_ticks = 0;
        self.time_secs = 0.0;
        self.last_shot = None;

        let count = self.settings.initial_asteroids;
        self.spawn_asteroids(count);

        self.events.push(GameEvent::Reset);
        log::info!("Game reset with {} asteroids", self.asteroids.len());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Produce a freshly spawned asteroid (not yet in the field)
    pub fn new_asteroid(&mut self) -> Asteroid {
        let id = self.next_entity_id();
        let avoid = self.player.center();
        spawn_asteroid(id, &self.settings, &mut self.rng, avoid)
    }

    /// Add `count` freshly spawned asteroids to the field
    pub fn spawn_asteroids(&mut self, count: usize) {
        for _ in 0..count {
            let asteroid = self.new_asteroid();
            self.asteroids.push(asteroid);
        }
    }

    /// Start an explosion at `pos` when effects are enabled
    pub fn spawn_explosion(&mut self, pos: Vec2) {
        if self.settings.explosions {
            self.explosions.push(Explosion::new(pos));
        }
    }

    /// Enter GameOver (no-op if already over)
    pub fn end_game(&mut self, reason: EndReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);
        self.events.push(GameEvent::GameOver { reason });
        log::info!(
            "Game over ({:?}) after {} kills at level {}",
            reason,
            self.kills,
            self.difficulty.level
        );
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
