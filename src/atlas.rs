//! Sprite sheet coordinates and draw list generation
//!
//! The crate draws nothing itself. A renderer walks the draw list produced
//! here and copies each source rectangle from the sprite sheet to the
//! destination rectangle on screen.

use glam::Vec2;
use serde::Serialize;

use crate::settings::{BoundaryPolicy, GameOverPolicy};
use crate::sim::GameState;
use crate::sim::physics::wrap_images;

/// Integer rectangle on a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpriteRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl SpriteRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// Which sheet a sprite is cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sheet {
    /// ship.png (ship, firing ship, bullet)
    Ship,
    /// meteor.png (meteor and explosion frames)
    Meteor,
    /// hearts.png
    Hearts,
}

pub const SHIP: SpriteRect = SpriteRect::new(7, 7, 18, 18);
pub const SHIP_FIRING: SpriteRect = SpriteRect::new(39, 7, 18, 18);
pub const BULLET: SpriteRect = SpriteRect::new(15, 43, 3, 6);
pub const METEOR: SpriteRect = SpriteRect::new(41, 10, 13, 12);
pub const HEART: SpriteRect = SpriteRect::new(12, 13, 7, 6);

/// Explosion animation, one rectangle per frame
pub const EXPLOSION_FRAMES: [SpriteRect; 6] = [
    SpriteRect::new(73, 10, 13, 12),
    SpriteRect::new(9, 42, 13, 12),
    SpriteRect::new(41, 41, 15, 14),
    SpriteRect::new(70, 40, 18, 18),
    SpriteRect::new(8, 76, 13, 11),
    SpriteRect::new(42, 77, 11, 9),
];

/// HUD heart layout
const HEART_MARGIN: f32 = 10.0;
const HEART_SPACING: f32 = 20.0;
const HEART_BOTTOM_OFFSET: f32 = 25.0;
const HEART_SCALE: f32 = 3.0;

/// Source rectangle for an explosion frame; out-of-range frames show frame 0
pub fn explosion_frame(frame: u32) -> SpriteRect {
    EXPLOSION_FRAMES
        .get(frame as usize)
        .copied()
        .unwrap_or(EXPLOSION_FRAMES[0])
}

/// One sprite blit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteDraw {
    pub sheet: Sheet,
    pub src: SpriteRect,
    /// Top-left corner on screen
    pub pos: Vec2,
    pub size: Vec2,
}

/// Screen placement of the remaining-life hearts, bottom-left corner
pub fn heart_draws(lives: u8, arena_height: f32) -> Vec<SpriteDraw> {
    let w = HEART.w as f32;
    let h = HEART.h as f32;
    let y = arena_height - h - HEART_BOTTOM_OFFSET;
    (0..lives)
        .map(|i| SpriteDraw {
            sheet: Sheet::Hearts,
            src: HEART,
            pos: Vec2::new(HEART_MARGIN + f32::from(i) * (w + HEART_SPACING), y),
            size: Vec2::new(w * HEART_SCALE, h * HEART_SCALE),
        })
        .collect()
}

/// Everything to draw this frame, back to front
pub fn draw_list(state: &GameState) -> Vec<SpriteDraw> {
    let mut draws = Vec::with_capacity(
        state.asteroids.len() + state.explosions.len() + state.bullets.len() + 4,
    );

    let settings = &state.settings;
    for a in &state.asteroids {
        // A wrapped asteroid straddling an edge is visible on both sides
        let images = match settings.boundary {
            BoundaryPolicy::Reflect => vec![a.pos],
            BoundaryPolicy::Wrap => {
                wrap_images(a.pos, a.size, settings.arena_width, settings.arena_height)
            }
        };
        draws.extend(images.into_iter().map(|pos| SpriteDraw {
            sheet: Sheet::Meteor,
            src: METEOR,
            pos,
            size: Vec2::splat(a.size),
        }));
    }

    let explosion_size = Vec2::splat(state.settings.asteroid_size);
    draws.extend(state.explosions.iter().map(|e| SpriteDraw {
        sheet: Sheet::Meteor,
        src: explosion_frame(e.frame),
        pos: e.pos,
        size: explosion_size,
    }));

    draws.extend(state.bullets.iter().map(|b| SpriteDraw {
        sheet: Sheet::Ship,
        src: BULLET,
        pos: b.pos,
        size: Vec2::splat(b.size),
    }));

    let player = &state.player;
    draws.push(SpriteDraw {
        sheet: Sheet::Ship,
        src: if player.firing { SHIP_FIRING } else { SHIP },
        pos: player.pos,
        size: Vec2::splat(player.size),
    });

    if matches!(state.settings.game_over, GameOverPolicy::Lives { .. }) {
        draws.extend(heart_draws(state.lives, state.settings.arena_height));
    }

    draws
}
