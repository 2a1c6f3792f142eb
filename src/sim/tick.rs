//! Simulation tick
//!
//! One call advances the game by `dt`: input mapping, movement, collision
//! resolution, then spawning. Collections are rebuilt from survivors rather
//! than edited while being iterated.

use glam::Vec2;

use super::collision::{PairOutcome, PairSide, image_shift, resolve_asteroid_pair, touching};
use super::input::{TickInput, autopilot, fire_ready, player_velocity};
use super::physics::{clamp_to_arena, confine};
use super::state::{Asteroid, Bullet, EndReason, GameEvent, GamePhase, GameState};
use crate::settings::{GameOverPolicy, HitPolicy, SplitRules};

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.player.firing = false;

    if input.reset {
        state.reset();
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    let input = if input.idle_mode {
        autopilot(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    state.time_secs += f64::from(dt);

    apply_input(state, &input);

    move_player(state, dt);
    move_asteroids(state, dt);
    move_bullets(state, dt);
    state.explosions.retain_mut(|e| e.advance(dt));

    resolve_bullet_hits(state);
    if let Some(rules) = state.settings.splitting {
        resolve_asteroid_collisions(state, &rules);
    }
    resolve_player_hits(state);

    refill_field(state);
}

/// Set player velocity from held keys and fire if the cooldown allows
fn apply_input(state: &mut GameState, input: &TickInput) {
    state.player.vel = player_velocity(input, state.difficulty.player_speed);

    if input.fire && fire_ready(state.last_shot, state.time_secs, state.difficulty.bullet_cooldown)
    {
        let size = state.settings.bullet_size;
        let player = &state.player;
        // Leaves from the top-center of the ship
        let pos = Vec2::new(player.pos.x + (player.size - size) / 2.0, player.pos.y);
        state.bullets.push(Bullet {
            pos,
            speed: state.settings.bullet_speed,
            size,
        });
        state.last_shot = Some(state.time_secs);
        state.player.firing = true;
        state.events.push(GameEvent::BulletFired);
    }
}

fn move_player(state: &mut GameState, dt: f32) {
    let settings = &state.settings;
    let player = &mut state.player;
    player.pos = clamp_to_arena(
        player.pos + player.vel * dt,
        player.size,
        settings.arena_width,
        settings.arena_height,
    );
}

fn move_asteroids(state: &mut GameState, dt: f32) {
    let settings = &state.settings;
    let scale = state.difficulty.speed_multiplier * dt;
    for asteroid in &mut state.asteroids {
        let (pos, vel) = confine(
            settings.boundary,
            asteroid.pos + asteroid.vel * scale,
            asteroid.vel,
            asteroid.size,
            settings.arena_width,
            settings.arena_height,
        );
        asteroid.pos = pos;
        asteroid.vel = vel;
    }
}

/// Move bullets and drop the ones that have left the arena vertically
fn move_bullets(state: &mut GameState, dt: f32) {
    let height = state.settings.arena_height;
    state.bullets.retain_mut(|bullet| {
        bullet.pos.y += bullet.speed * dt;
        bullet.pos.y + bullet.size >= 0.0 && bullet.pos.y <= height
    });
}

/// Bullets against asteroids: each bullet destroys at most one asteroid
fn resolve_bullet_hits(state: &mut GameState) {
    if state.bullets.is_empty() {
        return;
    }

    let on_hit = state.settings.on_hit;
    let threshold = state.settings.kill_threshold;

    let bullets = std::mem::take(&mut state.bullets);
    let mut survivors = Vec::with_capacity(bullets.len());
    let mut destroyed = vec![false; state.asteroids.len()];
    let mut bonus_spawns = 0;

    for bullet in bullets {
        let hit = (0..state.asteroids.len())
            .find(|&i| !destroyed[i] && touching(&state.settings, &bullet, &state.asteroids[i]));
        let Some(index) = hit else {
            survivors.push(bullet);
            continue;
        };

        let pos = state.asteroids[index].pos;
        state.spawn_explosion(pos);
        match on_hit {
            HitPolicy::Respawn => {
                let fresh = state.new_asteroid();
                state.asteroids[index] = fresh;
            }
            HitPolicy::Remove => destroyed[index] = true,
        }

        state.kills += 1;
        state.events.push(GameEvent::AsteroidDestroyed { kills: state.kills });
        log::debug!("Asteroid destroyed! Kill count: {}", state.kills);

        if state.kills % threshold == 0 {
            state.difficulty.raise(&state.settings);
            bonus_spawns += 1;
            let level = state.difficulty.level;
            state.events.push(GameEvent::DifficultyRaised { level });
            log::info!(
                "Difficulty level {}: asteroid speed x{:.2}, cooldown {:.2}s",
                level,
                state.difficulty.speed_multiplier,
                state.difficulty.bullet_cooldown
            );
        }
    }

    state.bullets = survivors;
    if destroyed.contains(&true) {
        let asteroids = std::mem::take(&mut state.asteroids);
        state.asteroids = asteroids
            .into_iter()
            .zip(destroyed)
            .filter_map(|(asteroid, gone)| (!gone).then_some(asteroid))
            .collect();
    }
    state.spawn_asteroids(bonus_spawns);

    if let Some(target) = state.settings.kill_target {
        if state.kills >= target {
            state.end_game(EndReason::KillTarget);
        }
    }
}

/// Asteroids against each other; each asteroid takes part in at most one
/// collision per tick
fn resolve_asteroid_collisions(state: &mut GameState, rules: &SplitRules) {
    let mut asteroids = std::mem::take(&mut state.asteroids);
    let count = asteroids.len();
    let mut busy = vec![false; count];
    let mut fragments: Vec<Option<[Asteroid; 2]>> = vec![None; count];

    for i in 0..count {
        if busy[i] {
            continue;
        }
        for j in (i + 1)..count {
            if busy[j] || !touching(&state.settings, &asteroids[i], &asteroids[j]) {
                continue;
            }

            // Resolve against the copy of `j` that `i` meets on a wrapping arena
            let image = Asteroid {
                pos: asteroids[j].pos + image_shift(&state.settings, &asteroids[i], &asteroids[j]),
                ..asteroids[j].clone()
            };
            match resolve_asteroid_pair(&asteroids[i], &image, rules) {
                PairOutcome::Separating => continue,
                PairOutcome::Bounce {
                    first_vel,
                    second_vel,
                    push,
                } => {
                    let settings = &state.settings;
                    for (index, vel, shift) in [(i, first_vel, push), (j, second_vel, -push)] {
                        let a = &mut asteroids[index];
                        (a.pos, a.vel) = confine(
                            settings.boundary,
                            a.pos + shift,
                            vel,
                            a.size,
                            settings.arena_width,
                            settings.arena_height,
                        );
                    }
                }
                PairOutcome::Split {
                    slower,
                    fragments: pieces,
                } => {
                    let index = match slower {
                        PairSide::First => i,
                        PairSide::Second => j,
                    };
                    let parent = asteroids[index].id;
                    let settings = &state.settings;
                    let children = pieces.map(|piece| {
                        let (pos, vel) = confine(
                            settings.boundary,
                            piece.pos,
                            piece.vel,
                            piece.size,
                            settings.arena_width,
                            settings.arena_height,
                        );
                        Asteroid {
                            id: 0,
                            pos,
                            vel,
                            size: piece.size,
                        }
                    });
                    fragments[index] = Some(children);
                    state.events.push(GameEvent::AsteroidSplit { id: parent });
                    log::debug!("Asteroid {} split into two", parent);
                }
            }
            busy[i] = true;
            busy[j] = true;
            break;
        }
    }

    let mut rebuilt = Vec::with_capacity(count + 1);
    for (asteroid, split) in asteroids.into_iter().zip(fragments) {
        match split {
            Some(children) => {
                for mut child in children {
                    child.id = state.next_entity_id();
                    rebuilt.push(child);
                }
            }
            None => rebuilt.push(asteroid),
        }
    }
    state.asteroids = rebuilt;
}

/// Player against asteroids: at most one hit per tick
fn resolve_player_hits(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let Some(index) = state
        .asteroids
        .iter()
        .position(|a| touching(&state.settings, &state.player, a))
    else {
        return;
    };

    let pos = state.asteroids[index].pos;
    state.spawn_explosion(pos);

    // The offending asteroid respawns under either policy
    let fresh = state.new_asteroid();
    state.asteroids[index] = fresh;

    match state.settings.game_over {
        GameOverPolicy::Lives { .. } => {
            state.lives = state.lives.saturating_sub(1);
            state.events.push(GameEvent::PlayerHit { lives: state.lives });
            log::debug!("Collision detected! Lives left: {}", state.lives);

            if state.lives == 0 {
                state.end_game(EndReason::OutOfLives);
            }
        }
        GameOverPolicy::Immediate => {
            state.lives = 0;
            state.events.push(GameEvent::PlayerHit { lives: 0 });
            state.end_game(EndReason::Collision);
        }
    }
}

/// Start a new wave once every asteroid is gone
fn refill_field(state: &mut GameState) {
    let count = state.settings.initial_asteroids;
    if state.phase != GamePhase::Playing || !state.asteroids.is_empty() || count == 0 {
        return;
    }
    state.spawn_asteroids(count);
    state.events.push(GameEvent::FieldRefilled { count });
    log::info!("Field cleared, spawned {} new asteroids", count);
}
