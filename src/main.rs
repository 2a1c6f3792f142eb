//! Asteroid Shooter entry point
//!
//! Runs a headless attract session: the autopilot plays one run under the
//! chosen rules on a fixed-step clock, and the outcome is logged. Windowing
//! and drawing belong to a separate front end that consumes `atlas::draw_list`.
//!
//! Usage: asteroid-shooter [VARIANT | SETTINGS.json] [SECONDS] [--seed N] [--dump]
//!
//! Any numeric argument is the duration in seconds.

use std::process::ExitCode;

use serde::Serialize;

use asteroid_shooter::atlas::{SpriteDraw, draw_list};
use asteroid_shooter::sim::{EndReason, FixedStep, GameEvent, GamePhase, GameState, TickInput, tick};
use asteroid_shooter::{Settings, SettingsError, Variant};

/// Simulated display refresh for the attract session
const FRAME_DT: f32 = 1.0 / 144.0;
const DEFAULT_SECONDS: f32 = 60.0;

struct Options {
    settings: Settings,
    seconds: f32,
    seed: u64,
    dump: bool,
}

/// Rules from a variant name, or else from a settings file
fn resolve_rules(arg: &str) -> Result<Settings, SettingsError> {
    match Variant::from_str(arg) {
        Some(variant) => {
            log::info!("Using {} rules", variant.as_str());
            Ok(Settings::from_variant(variant))
        }
        None => Settings::load(arg),
    }
}

fn parse_args(args: &[String]) -> Result<Options, SettingsError> {
    let mut settings = None;
    let mut seconds = DEFAULT_SECONDS;
    let mut seed = 0x5eed_u64;
    let mut dump = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dump" => dump = true,
            "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| SettingsError::Invalid("--seed needs a value".to_string()))?;
                seed = value
                    .parse()
                    .map_err(|_| SettingsError::Invalid(format!("bad seed: {value}")))?;
            }
            // A number is always the duration, so the rules may be omitted
            other => match other.parse::<f32>() {
                Ok(secs) if secs > 0.0 && secs.is_finite() => seconds = secs,
                Ok(_) => {
                    return Err(SettingsError::Invalid(format!(
                        "duration must be positive, got {other}"
                    )));
                }
                Err(_) if settings.is_none() && !other.starts_with("--") => {
                    settings = Some(resolve_rules(other)?);
                }
                Err(_) => {
                    return Err(SettingsError::Invalid(format!("unexpected argument: {other}")));
                }
            },
        }
    }

    Ok(Options {
        settings: settings.unwrap_or_default(),
        seconds,
        seed,
        dump,
    })
}

/// Final state as printed by --dump
#[derive(Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    kills: u32,
    lives: u8,
    level: u32,
    phase: GamePhase,
    end_reason: Option<EndReason>,
    draws: Vec<SpriteDraw>,
}

/// Game instance holding all state
struct Game {
    state: GameState,
    clock: FixedStep,
    input: TickInput,
}

impl Game {
    fn new(settings: Settings, seed: u64) -> Self {
        Self {
            clock: FixedStep::from_settings(&settings),
            state: GameState::new(settings, seed),
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
        }
    }

    /// Run simulation ticks
    fn update(&mut self, frame_dt: f32) {
        let steps = self.clock.advance(frame_dt);
        for _ in 0..steps {
            tick(&mut self.state, &self.input, self.clock.dt());
            // Clear one-shot inputs after processing
            self.input.clear_one_shots();

            for event in &self.state.events {
                match event {
                    GameEvent::PlayerHit { lives } => log::info!("Ship hit, {lives} lives left"),
                    GameEvent::AsteroidSplit { id } => log::debug!("Asteroid {id} split"),
                    _ => {}
                }
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = options.settings.validate() {
        log::error!("{err}");
        return ExitCode::FAILURE;
    }

    log::info!(
        "Asteroid Shooter (headless) starting: seed {}, {:.0}s",
        options.seed,
        options.seconds
    );

    let mut game = Game::new(options.settings, options.seed);
    let frames = (options.seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        game.update(FRAME_DT);
        if game.state.is_over() {
            break;
        }
    }

    let state = &game.state;
    log::info!(
        "Session finished after {:.1}s: {} kills, {} lives, level {}, {} asteroids",
        state.time_secs,
        state.kills,
        state.lives,
        state.difficulty.level,
        state.asteroids.len()
    );

    if options.dump {
        let summary = Summary {
            seed: state.seed,
            ticks: state.time_ticks,
            kills: state.kills,
            lives: state.lives,
            level: state.difficulty.level,
            phase: state.phase,
            end_reason: state.end_reason,
            draws: draw_list(state),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                log::error!("failed to serialize summary: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
