/// Entry point and frame loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;
#[cfg(test)]
mod test_support;

use std::error::Error;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};

use config::GameConfig;
use sim::event::GameEvent;
use sim::level::{build_state, find_level, level_names};
use sim::step::step;
use sim::world::{GameState, Outcome, Phase};
use ui::backend::{self, BackendKind};
use ui::input::map_key;
use ui::renderer::Renderer;
use ui::terminal::{Terminal, TerminalSession};

#[derive(Parser)]
#[command(name = "tilechase", about = "Terminal tile-movement game with pursuing enemies")]
struct Args {
    /// Level name or path to a level .txt file
    #[arg(short, long)]
    level: Option<String>,

    /// Terminal backend (overrides config)
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,

    /// Config file to use instead of searching for config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the available level names and exit
    #[arg(long)]
    list_levels: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load_from(path),
        None => GameConfig::load(),
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("Warning: logging disabled: {e}");
    }

    if args.list_levels {
        for name in level_names(&config.levels_dir) {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    match run(&args, &config) {
        Ok((outcome, state)) => {
            // The session is closed by now, so this lands on the normal screen.
            println!();
            match outcome {
                Outcome::Quit => println!("Thanks for playing Tile Chase!"),
                Outcome::Caught => println!("Caught on tick {} in {}.", state.tick, state.level_name),
            }
            if state.catches > 0 {
                println!("Times caught: {}", state.catches);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// File logger; stdout belongs to the game display.
fn init_logging(config: &GameConfig) -> Result<(), Box<dyn Error>> {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    let log_file = File::create(&config.log_file)
        .map_err(|e| format!("cannot create {}: {e}", config.log_file.display()))?;
    WriteLogger::init(config.log_filter(), log_config, log_file)?;
    Ok(())
}

fn run(args: &Args, config: &GameConfig) -> error::Result<(Outcome, GameState)> {
    let query = args.level.as_deref().or(config.level.as_deref());
    let def = find_level(query, &config.levels_dir)?;
    let mut state = build_state(&def, config)?;

    let kind = args.backend.unwrap_or(config.display.backend);
    log::info!(
        "starting `{}` with {} enemies on the {:?} backend",
        state.level_name, state.npcs.len(), kind
    );

    let mut session = TerminalSession::open(backend::open(kind))?;
    let mut renderer = Renderer::new(config.display.status_line);

    game_loop(&mut state, &mut session, &mut renderer)?;
    session.close()?;

    let outcome = match state.phase {
        Phase::Terminated(outcome) => outcome,
        Phase::Running => Outcome::Quit,
    };
    log::info!("session over after {} ticks: {:?}", state.tick, outcome);
    Ok((outcome, state))
}

fn game_loop<T: Terminal>(
    state: &mut GameState,
    session: &mut TerminalSession<T>,
    renderer: &mut Renderer,
) -> io::Result<()> {
    renderer.render(session.terminal(), state)?;

    loop {
        let command = session.terminal().poll_key()?.as_ref().and_then(map_key);
        let events = step(state, command);
        log_events(&events);

        if !state.is_running() {
            break;
        }

        renderer.erase_vacated(session.terminal(), state, &events)?;
        renderer.render(session.terminal(), state)?;

        if !state.tick_period.is_zero() {
            thread::sleep(state.tick_period);
        }
    }

    Ok(())
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Caught { id, at } => log::info!("enemy {id} caught the player at ({}, {})", at.x, at.y),
            GameEvent::QuitRequested => log::info!("quit requested"),
            GameEvent::PlayerBlocked { .. } | GameEvent::NpcBlocked { .. } => log::trace!("{event:?}"),
            GameEvent::PlayerMoved { .. } | GameEvent::NpcMoved { .. } => log::debug!("{event:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Pos;
    use crate::sim::world::CapturePolicy;
    use crate::test_support::{bordered_rows, state_for, LevelBuilder, MemoryTerminal};

    fn play(state: &mut GameState, mem: &mut MemoryTerminal) {
        let mut session = TerminalSession::open(&mut *mem).unwrap();
        let mut renderer = Renderer::new(true);
        game_loop(state, &mut session, &mut renderer).unwrap();
        session.close().unwrap();
    }

    #[test]
    fn scripted_moves_then_quit() {
        let def = LevelBuilder::new(bordered_rows(10, 8)).player(4, 4).tick_ms(0).build();
        let mut state = state_for(&def);
        let mut mem = MemoryTerminal::with_keys("ddxsq");

        play(&mut state, &mut mem);

        assert_eq!(state.player.pos, Pos::new(6, 5));
        assert_eq!(state.phase, Phase::Terminated(Outcome::Quit));
        assert_eq!(state.tick, 5);
        assert_eq!(mem.shutdown_calls, 1);
        assert!(mem.cursor_visible);
        assert_eq!(mem.char_at(6, 5), Some('@'));
        assert_eq!(mem.char_at(4, 4), Some(' '));
    }

    #[test]
    fn keys_after_quit_are_not_consumed() {
        let def = LevelBuilder::new(bordered_rows(10, 8)).tick_ms(0).build();
        let mut state = state_for(&def);
        let mut mem = MemoryTerminal::with_keys("qdd");
        play(&mut state, &mut mem);
        assert_eq!(mem.keys.len(), 2);
        assert_eq!(state.player.pos, Pos::new(5, 4));
    }

    #[test]
    fn end_policy_leaves_the_loop_on_capture() {
        let def = LevelBuilder::new(bordered_rows(10, 8))
            .player(4, 4)
            .enemy(4, 3)
            .throttle(1)
            .tick_ms(0)
            .build();
        let mut state = state_for(&def);
        state.capture = CapturePolicy::End;
        let mut mem = MemoryTerminal::new();

        play(&mut state, &mut mem);

        assert_eq!(state.phase, Phase::Terminated(Outcome::Caught));
        assert_eq!(state.catches, 1);
        assert_eq!(mem.shutdown_calls, 1);
    }

    #[test]
    fn unwritable_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GameConfig::default();
        config.log_file = dir.path().join("missing").join("tilechase.log");
        let err = init_logging(&config).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["tilechase", "--level", "Urban Block", "--backend", "ansi"]).unwrap();
        assert_eq!(args.level.as_deref(), Some("Urban Block"));
        assert_eq!(args.backend, Some(BackendKind::Ansi));
        assert!(!args.list_levels);
        assert!(Args::try_parse_from(["tilechase", "--backend", "curses"]).is_err());
    }
}
