//! Error types
//!
//! Rejected user input is never an error: the two entry points on
//! `Engine` silently ignore it. These types cover calls that break the
//! engine's preconditions and malformed setups.

use crate::board::Pos;
use crate::game::{PieceId, Player};

/// A precondition of `execute_move`/`execute_drop` was not met.
/// The engine state is unchanged when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("game is already finished")]
    GameFinished,

    #[error("unknown piece id {0:?}")]
    UnknownPiece(PieceId),

    #[error("position {0} is off the board")]
    OutOfBounds(Pos),

    #[error("piece {piece:?} is not at {pos}")]
    PieceNotAt { piece: PieceId, pos: Pos },

    #[error("piece {piece:?} belongs to {owner:?}, but it is {current:?}'s turn")]
    NotCurrentPlayer {
        piece: PieceId,
        owner: Player,
        current: Player,
    },

    #[error("{from} -> {to} is not a legal move")]
    IllegalMove { from: Pos, to: Pos },

    #[error("piece {0:?} is not in the current player's reserve")]
    NotInReserve(PieceId),

    #[error("cannot drop onto occupied cell {0}")]
    CellOccupied(Pos),
}

/// Invalid initial placement list
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("placement at {0} is off the board")]
    OutOfBounds(Pos),

    #[error("cell {0} is occupied twice")]
    DuplicateCell(Pos),

    #[error("{0:?} has more than one king")]
    MultipleKings(Player),

    #[error("setup has {count} pieces, the board holds at most {max}")]
    TooManyPieces { count: usize, max: usize },
}
