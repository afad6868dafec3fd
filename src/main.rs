//! Arena Survivor headless runner
//!
//! Plays a session with a simple autopilot and prints the final HUD as JSON.
//!
//! Usage: `arena-survivor [config.json] [--seconds N] [--seed S]`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;

use arena_survivor::consts::{DEFAULT_SEED, FRAME_DT};
use arena_survivor::sim::{GamePhase, GameState, HeldKeys, TickInput, tick};
use arena_survivor::GameConfig;

#[derive(Parser)]
#[command(name = "arena-survivor")]
#[command(about = "Headless Arena Survivor session with an autopilot player")]
#[command(version)]
struct Cli {
    /// Balance config (JSON); built-in defaults when omitted
    config: Option<PathBuf>,

    /// Seconds of simulated play
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// RNG seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

/// Steer away from close enemies, otherwise drift toward the nearest gem
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    match state.phase {
        GamePhase::LevelUp => {
            input.confirm_choice = Some(0);
            return input;
        }
        GamePhase::Playing => {}
        _ => return input,
    }

    let pos = state.player.pos;
    let threat = state
        .nearest_enemy(pos)
        .map(|i| state.enemies[i].pos)
        .filter(|e| e.distance(pos) < 200.0);
    let goal = match threat {
        Some(enemy) => pos - enemy,
        None => state
            .gems
            .iter()
            .map(|g| g.pos)
            .min_by(|a, b| {
                a.distance_squared(pos)
                    .partial_cmp(&b.distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|g| g - pos)
            .unwrap_or(Vec2::ZERO),
    };

    input.keys = HeldKeys {
        up: goal.y < -1.0,
        down: goal.y > 1.0,
        left: goal.x < -1.0,
        right: goal.x > 1.0,
    };
    input.fire = true;
    input
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::info!("No config given, using built-in balance");
            GameConfig::default()
        }
    };

    log::info!(
        "Arena Survivor (headless) starting: seed {}, {:.0}s",
        cli.seed,
        cli.seconds
    );

    let mut state = GameState::new(config, cli.seed);
    let start = TickInput {
        restart: true,
        ..Default::default()
    };
    tick(&mut state, &start, FRAME_DT);

    let frames = (cli.seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        let input = autopilot(&state);
        tick(&mut state, &input, FRAME_DT);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let hud = state.hud();
    log::info!(
        "Run finished: {:?} after {:.1}s, level {}, {} kills",
        hud.phase,
        hud.elapsed,
        hud.level,
        hud.kills
    );
    match serde_json::to_string_pretty(&hud) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize HUD: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["arena-survivor"]).unwrap();
        assert!(cli.config.is_none());
        assert_eq!(cli.seconds, 120.0);
        assert_eq!(cli.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_cli_flags_and_config() {
        let cli =
            Cli::try_parse_from(["arena-survivor", "balance.json", "--seconds", "30", "--seed", "7"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("balance.json")));
        assert_eq!(cli.seconds, 30.0);
        assert_eq!(cli.seed, 7);

        assert!(Cli::try_parse_from(["arena-survivor", "--seconds", "soon"]).is_err());
        assert!(Cli::try_parse_from(["arena-survivor", "a.json", "b.json"]).is_err());
    }
}
