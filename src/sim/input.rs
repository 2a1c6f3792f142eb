//! Keyboard state to player intent
//!
//! The platform layer feeds key presses into a `TickInput`; the tick turns
//! held directions into player velocity and gates firing on the cooldown.

use glam::Vec2;

use super::state::GameState;

/// Keys the game responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Space bar
    Fire,
    /// 'R'
    Reset,
    /// 'P'
    Pause,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire held (space)
    pub fire: bool,
    /// Restart the run (one-shot)
    pub reset: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Record a key press or release from the platform event loop
    pub fn set_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Up => self.up = pressed,
            Key::Down => self.down = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Fire => self.fire = pressed,
            // One-shots latch on press and are cleared after a tick consumes them
            Key::Reset => self.reset |= pressed,
            Key::Pause => self.pause |= pressed,
        }
    }

    /// Clear one-shot inputs after processing
    pub fn clear_one_shots(&mut self) {
        self.reset = false;
        self.pause = false;
    }

    /// Signed sum of held directions (screen coordinates, +y is down)
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Player velocity for the held directions; opposing keys cancel
#[inline]
pub fn player_velocity(input: &TickInput, speed: f32) -> Vec2 {
    input.direction() * speed
}

/// Whether a shot may leave at `now` given the previous shot time
#[inline]
pub fn fire_ready(last_shot: Option<f64>, now: f64, cooldown: f32) -> bool {
    match last_shot {
        None => true,
        Some(last) => now - last >= f64::from(cooldown),
    }
}

/// Horizontal slack before the autopilot stops steering (px)
const AUTOPILOT_DEADZONE: f32 = 4.0;
/// Autopilot dodges asteroids whose centers come this close (in asteroid sizes)
const AUTOPILOT_DANGER: f32 = 3.0;

/// Demo input: hold the lower part of the arena, line up under the nearest
/// asteroid and fire, and sidestep anything closing in
pub fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let player = state.player.center();
    let settings = &state.settings;
    let danger = settings.asteroid_size * AUTOPILOT_DANGER;

    // Dodge the closest asteroid that is inside the danger radius and closing
    let threat = state
        .asteroids
        .iter()
        .filter(|a| {
            let offset = player - a.center();
            offset.length() < danger && a.vel.dot(offset) > 0.0
        })
        .min_by(|a, b| {
            a.center()
                .distance_squared(player)
                .total_cmp(&b.center().distance_squared(player))
        });

    if let Some(threat) = threat {
        let away = player - threat.center();
        input.left = away.x < 0.0;
        input.right = away.x > 0.0;
        input.up = away.y < 0.0;
        input.down = away.y > 0.0;
        return input;
    }

    // Drift back toward the firing line
    let home_y = settings.arena_height * 0.8;
    input.up = player.y > home_y + AUTOPILOT_DEADZONE;
    input.down = player.y < home_y - AUTOPILOT_DEADZONE;

    // Target the nearest asteroid above the ship
    let target = state
        .asteroids
        .iter()
        .filter(|a| a.center().y < player.y)
        .min_by(|a, b| {
            a.center()
                .distance_squared(player)
                .total_cmp(&b.center().distance_squared(player))
        });

    if let Some(target) = target {
        let dx = target.center().x - player.x;
        input.left = dx < -AUTOPILOT_DEADZONE;
        input.right = dx > AUTOPILOT_DEADZONE;
        input.fire = dx.abs() < target.size / 2.0;
    }

    input
}
