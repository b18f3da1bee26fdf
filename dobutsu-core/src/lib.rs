//! DOBUTSU Core - Rules engine for animal shogi
//!
//! This crate provides the game logic for the 3x4 animal shogi variant:
//! - Board geometry (3 columns, 4 rows)
//! - Piece kinds and their step offsets
//! - Engine state: board, reserves, turn, selection, status
//! - Move and drop execution with capture, promotion, and win detection
//! - Setup files describing the initial placement

pub mod board;
pub mod error;
pub mod game;
pub mod pieces;
pub mod setup;

// Re-exports for convenient access
pub use board::{far_row, home_row, Pos, BOARD_HEIGHT, BOARD_WIDTH, NUM_CELLS};
pub use error::{ContractViolation, SetupError};
pub use game::{
    compute_destinations, Action, CellView, Engine, Event, GameObserver, GameStatus, Piece,
    PieceId, Player, ReserveEntry, Selection, Snapshot, WinReason,
};
pub use pieces::{Offset, PieceKind};
pub use setup::{Placement, Setup};
