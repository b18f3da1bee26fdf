//! DOBUTSU CLI - Terminal front-end
//!
//! Commands:
//! - play: Play a game on the terminal
//! - setup: Write a built-in setup as JSON
//! - show: Print the initial board of a setup

mod play_cmd;
mod render;
mod setup_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dobutsu")]
#[command(about = "Animal shogi on a 3x4 board")]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. "debug" or "dobutsu_core=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game, reading commands from stdin
    Play(play_cmd::PlayArgs),
    /// Write a built-in setup as JSON
    Setup(setup_cmd::SetupArgs),
    /// Print the initial board of a setup
    Show(setup_cmd::ShowArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Setup(args) => setup_cmd::run_setup(args),
        Commands::Show(args) => setup_cmd::run_show(args),
    }
}

/// Logs go to stderr so stdout stays clean for the board and JSON output
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
