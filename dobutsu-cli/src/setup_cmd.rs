//! Setup and show commands - export and inspect initial placements

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use dobutsu_core::{Engine, Player, Setup};

use crate::play_cmd::load_setup;
use crate::render::render;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Side {
    Top,
    Bottom,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::Top => Player::Top,
            Side::Bottom => Player::Bottom,
        }
    }
}

#[derive(Args)]
pub struct SetupArgs {
    /// Lions and chicks only
    #[arg(long)]
    pub minimal: bool,

    /// Side that moves first
    #[arg(long, value_enum, default_value = "bottom")]
    pub first: Side,

    /// Output file (default: stdout)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Setup JSON file (default: standard opening)
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,
}

/// Write a built-in setup as JSON
pub fn run_setup(args: SetupArgs) -> Result<()> {
    let setup = builtin_setup(args.minimal).with_first_player(args.first.into());

    match &args.out {
        Some(path) => {
            setup
                .save(path)
                .with_context(|| format!("Failed to write setup: {}", path.display()))?;
            tracing::info!("Saved setup '{}' to {}", setup.name, path.display());
        }
        None => println!("{}", setup.to_json()?),
    }
    Ok(())
}

/// Print the initial board of a setup
pub fn run_show(args: ShowArgs) -> Result<()> {
    let setup = load_setup(args.setup.as_ref())?;
    let engine = Engine::new(&setup).context("Invalid setup")?;
    println!("{}", setup.name);
    println!("{}", render(&engine));
    Ok(())
}

fn builtin_setup(minimal: bool) -> Setup {
    if minimal {
        Setup::lions_and_chicks()
    } else {
        Setup::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_setup_selection() {
        assert_eq!(builtin_setup(true).placements.len(), 4);
        assert_eq!(builtin_setup(false).placements.len(), 8);
    }

    #[test]
    fn test_saved_setup_loads_back() {
        let path = std::env::temp_dir().join(format!("dobutsu-setup-{}.json", std::process::id()));
        run_setup(SetupArgs {
            minimal: true,
            first: Side::Top,
            out: Some(path.clone()),
        })
        .unwrap();

        let loaded = load_setup(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, Setup::lions_and_chicks().with_first_player(Player::Top));
    }

    #[test]
    fn test_missing_setup_file_reports_path() {
        let path = PathBuf::from("/nonexistent/dobutsu.json");
        let err = load_setup(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/dobutsu.json"));
    }
}
