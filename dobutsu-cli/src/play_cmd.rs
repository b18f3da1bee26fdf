//! Play command - a terminal presentation layer over the engine
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_setup(), play_session()
//! - Level 3: parse_command(), handle_command()
//! - Level 4: output helpers

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use dobutsu_core::{Engine, Event, GameStatus, PieceId, Player, Pos, Setup};

use crate::render::{describe_event, render};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Setup JSON file (default: standard opening)
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Print JSON snapshots instead of the text board
    #[arg(long)]
    pub json: bool,
}

/// A line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    /// Activate a board cell
    Cell(Pos),
    /// Activate the N-th piece of the current player's reserve
    Reserve(usize),
    Show,
    Help,
    Quit,
}

const HELP: &str = "commands: c X Y (activate cell), r N (activate reserve piece), show, help, quit";

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Load the setup
/// 2. Run the input loop on stdin/stdout
/// 3. Report the result
pub fn run(args: PlayArgs) -> Result<()> {
    let setup = load_setup(args.setup.as_ref())?;
    let mut engine = Engine::new(&setup).context("Invalid setup")?;
    engine.subscribe(|event: &Event| tracing::info!(?event, "engine event"));

    tracing::info!("Starting game with setup '{}'", setup.name);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let status = play_session(&mut engine, stdin.lock(), stdout.lock(), args.json)?;

    if let GameStatus::Finished { winner, reason } = status {
        tracing::info!(?winner, ?reason, "game over");
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load a setup file, or the standard opening when none is given
pub fn load_setup(path: Option<&PathBuf>) -> Result<Setup> {
    match path {
        Some(path) => Setup::load(path)
            .with_context(|| format!("Failed to load setup: {}", path.display())),
        None => Ok(Setup::standard()),
    }
}

/// Feed input lines to the engine until the game ends, input runs out,
/// or the player quits. Returns the final status.
fn play_session<R: BufRead, W: Write>(
    engine: &mut Engine,
    input: R,
    mut output: W,
    json: bool,
) -> Result<GameStatus> {
    print_state(engine, &mut output, json)?;
    writeln!(output, "{HELP}")?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{err}")?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        handle_command(engine, command, &mut output, json)?;

        if engine.is_finished() {
            break;
        }
    }

    Ok(engine.status())
}

// ============================================================================
// LEVEL 3 - INPUT HANDLING
// ============================================================================

fn parse_command(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let number = |word: &str| -> Result<i64> {
        word.parse::<i64>()
            .with_context(|| format!("'{word}' is not a number"))
    };

    match words.as_slice() {
        ["c" | "cell", x, y] => {
            let x = i8::try_from(number(*x)?).context("column out of range")?;
            let y = i8::try_from(number(*y)?).context("row out of range")?;
            Ok(Command::Cell(Pos::new(x, y)))
        }
        ["r" | "reserve", n] => {
            let n = usize::try_from(number(*n)?).context("reserve index out of range")?;
            Ok(Command::Reserve(n))
        }
        ["show"] => Ok(Command::Show),
        ["help" | "?"] => Ok(Command::Help),
        ["q" | "quit" | "exit"] => Ok(Command::Quit),
        _ => bail!("unrecognized command '{}'; {HELP}", line.trim()),
    }
}

fn handle_command<W: Write>(
    engine: &mut Engine,
    command: Command,
    output: &mut W,
    json: bool,
) -> Result<()> {
    let events = match command {
        Command::Cell(pos) => engine.on_cell_activated(pos),
        Command::Reserve(n) => match reserve_piece(engine, engine.current_player(), n) {
            Some(piece) => engine.on_reserve_piece_activated(piece),
            None => vec![],
        },
        Command::Show => return print_state(engine, output, json),
        Command::Help => {
            writeln!(output, "{HELP}")?;
            return Ok(());
        }
        Command::Quit => return Ok(()),
    };

    if events.is_empty() {
        writeln!(output, "ignored")?;
        return Ok(());
    }

    if !json {
        for event in &events {
            writeln!(output, "{}", describe_event(engine, event))?;
        }
    }
    print_state(engine, output, json)
}

// ============================================================================
// LEVEL 4 - HELPERS
// ============================================================================

fn reserve_piece(engine: &Engine, player: Player, n: usize) -> Option<PieceId> {
    engine.reserve(player).get(n).copied()
}

fn print_state<W: Write>(engine: &Engine, output: &mut W, json: bool) -> Result<()> {
    if json {
        writeln!(output, "{}", serde_json::to_string(&engine.snapshot())?)?;
    } else {
        writeln!(output, "{}", render(engine))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dobutsu_core::WinReason;

    fn run_script(script: &str, json: bool) -> (GameStatus, String) {
        let mut engine = Engine::standard();
        let mut out = Vec::new();
        let status = play_session(&mut engine, script.as_bytes(), &mut out, json).unwrap();
        (status, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("c 1 2").unwrap(), Command::Cell(Pos::new(1, 2)));
        assert_eq!(parse_command("  cell 0 3 ").unwrap(), Command::Cell(Pos::new(0, 3)));
        assert_eq!(parse_command("r 0").unwrap(), Command::Reserve(0));
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert!(parse_command("c 1").is_err());
        assert!(parse_command("c a b").is_err());
        assert!(parse_command("r -1").is_err());
        assert!(parse_command("jump").is_err());
    }

    #[test]
    fn test_session_move_and_ignored_input() {
        let (status, out) = run_script("c 1 0\nc 1 2\nc 1 1\nquit\n", false);
        assert_eq!(status, GameStatus::InProgress);
        // Clicking Top's lion on Bottom's turn does nothing
        assert!(out.contains("ignored"));
        assert!(out.contains("Chick (1, 2) -> (1, 1), captured Chick"));
        assert!(out.contains("Bottom reserve: [0:C]"));
    }

    #[test]
    fn test_session_stops_when_game_ends() {
        // Bottom takes the chick, Top's elephant takes back, Bottom's lion
        // steps up, Top blunders, and Bottom's lion captures Top's lion
        let script = "\
            c 1 2\nc 1 1\n\
            c 2 0\nc 1 1\n\
            c 1 3\nc 2 2\n\
            c 0 0\nc 0 1\n\
            c 2 2\nc 2 1\n\
            c 1 0\nc 2 0\n\
            c 2 1\nc 2 0\n\
            show\n";
        let (status, out) = run_script(script, false);
        assert_eq!(
            status,
            GameStatus::Finished { winner: Player::Bottom, reason: WinReason::KingCaptured }
        );
        assert!(out.contains("Bottom wins (lion captured)"));
        // Once from the event, once from the board; the trailing "show" is never read
        assert_eq!(out.matches("Bottom wins (lion captured)").count(), 2);
        // The captured lion leaves play instead of joining Bottom's reserve
        assert!(!out
            .lines()
            .any(|line| line.starts_with("Bottom reserve") && line.contains(":L")));
    }

    #[test]
    fn test_session_json_output() {
        let (_, out) = run_script("c 1 2\n", true);
        let last = out.lines().last().unwrap();
        let snapshot: serde_json::Value = serde_json::from_str(last).unwrap();
        assert_eq!(snapshot["selection"]["cell"]["y"], 2);
        assert_eq!(snapshot["hints"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_reserve_command_out_of_range_is_ignored() {
        let (_, out) = run_script("r 3\n", false);
        assert!(out.contains("ignored"));
    }
}
