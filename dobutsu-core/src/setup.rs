//! Setup - initial piece placement

use crate::board::{Pos, NUM_CELLS};
use crate::error::SetupError;
use crate::game::Player;
use crate::pieces::PieceKind;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use anyhow::Context;
use std::path::Path;

/// One piece of the initial placement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: PieceKind,
    pub owner: Player,
    pub pos: Pos,
}

impl Placement {
    pub const fn new(kind: PieceKind, owner: Player, pos: Pos) -> Self {
        Self { kind, owner, pos }
    }
}

/// Initial position of a game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_first_player")]
    pub first_player: Player,
    pub placements: Vec<Placement>,
}

fn default_name() -> String {
    "unnamed".to_string()
}

fn default_first_player() -> Player {
    Player::Bottom
}

impl Setup {
    pub fn new(name: &str, placements: Vec<Placement>) -> Self {
        Self {
            name: name.to_string(),
            first_player: Player::Bottom,
            placements,
        }
    }

    /// Standard opening: elephant, lion, giraffe on each back row,
    /// chicks facing each other in the middle column
    pub fn standard() -> Self {
        use PieceKind::*;
        use Player::*;
        Self::new(
            "standard",
            vec![
                Placement::new(Heavy, Top, Pos::new(0, 0)),
                Placement::new(King, Top, Pos::new(1, 0)),
                Placement::new(Light, Top, Pos::new(2, 0)),
                Placement::new(Forward, Top, Pos::new(1, 1)),
                Placement::new(Forward, Bottom, Pos::new(1, 2)),
                Placement::new(Light, Bottom, Pos::new(0, 3)),
                Placement::new(King, Bottom, Pos::new(1, 3)),
                Placement::new(Heavy, Bottom, Pos::new(2, 3)),
            ],
        )
    }

    /// Lions and chicks only
    pub fn lions_and_chicks() -> Self {
        use PieceKind::*;
        use Player::*;
        Self::new(
            "lions-and-chicks",
            vec![
                Placement::new(King, Top, Pos::new(1, 0)),
                Placement::new(Forward, Top, Pos::new(1, 1)),
                Placement::new(Forward, Bottom, Pos::new(1, 2)),
                Placement::new(King, Bottom, Pos::new(1, 3)),
            ],
        )
    }

    pub fn with_first_player(mut self, player: Player) -> Self {
        self.first_player = player;
        self
    }

    /// Check bounds, overlaps, and king count
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.placements.len() > NUM_CELLS {
            return Err(SetupError::TooManyPieces {
                count: self.placements.len(),
                max: NUM_CELLS,
            });
        }

        let mut occupied = FxHashSet::default();
        let mut kings = [0usize; 2];
        for placement in &self.placements {
            if !placement.pos.is_valid() {
                return Err(SetupError::OutOfBounds(placement.pos));
            }
            if !occupied.insert(placement.pos) {
                return Err(SetupError::DuplicateCell(placement.pos));
            }
            if placement.kind.is_king() {
                kings[placement.owner.index()] += 1;
                if kings[placement.owner.index()] > 1 {
                    return Err(SetupError::MultipleKings(placement.owner));
                }
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON setup
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let setup: Setup = serde_json::from_str(content)?;
        setup.validate()?;
        Ok(setup)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::standard()
    }
}
