//! Board geometry: a 3-column by 4-row grid

use serde::{Deserialize, Serialize};

use crate::game::Player;

/// Number of columns
pub const BOARD_WIDTH: i8 = 3;

/// Number of rows
pub const BOARD_HEIGHT: i8 = 4;

/// Total number of cells
pub const NUM_CELLS: usize = (BOARD_WIDTH * BOARD_HEIGHT) as usize;

/// Cell coordinates. Row 0 is Top's back row, row 3 is Bottom's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i8,
    pub y: i8,
}

impl Pos {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Check if this position is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_WIDTH).contains(&self.x) && (0..BOARD_HEIGHT).contains(&self.y)
    }

    /// Row-major cell index. Only meaningful for valid positions.
    pub fn index(&self) -> usize {
        (self.y * BOARD_WIDTH + self.x) as usize
    }

    /// Inverse of `index`
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= NUM_CELLS {
            return None;
        }
        let index = index as i8;
        Some(Self::new(index % BOARD_WIDTH, index / BOARD_WIDTH))
    }

    /// Offset this position, returning None when it leaves the board
    pub fn offset(&self, dx: i8, dy: i8) -> Option<Self> {
        let pos = Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?);
        pos.is_valid().then_some(pos)
    }

    /// Point reflection through the board center
    pub fn mirrored(&self) -> Self {
        Self::new(BOARD_WIDTH - 1 - self.x, BOARD_HEIGHT - 1 - self.y)
    }

    /// Iterate every cell in row-major order
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..NUM_CELLS).filter_map(Pos::from_index)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The row a player's pieces start from
pub fn home_row(player: Player) -> i8 {
    match player {
        Player::Top => 0,
        Player::Bottom => BOARD_HEIGHT - 1,
    }
}

/// The row farthest from a player's own start: where chicks promote
/// and where a lion completes a try.
pub fn far_row(player: Player) -> i8 {
    home_row(player.opponent())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_validity() {
        assert!(Pos::new(0, 0).is_valid());
        assert!(Pos::new(2, 3).is_valid());
        assert!(!Pos::new(3, 0).is_valid());
        assert!(!Pos::new(0, 4).is_valid());
        assert!(!Pos::new(-1, 2).is_valid());
    }

    #[test]
    fn test_index_roundtrip() {
        for pos in Pos::all() {
            assert_eq!(Pos::from_index(pos.index()), Some(pos));
        }
        assert_eq!(Pos::all().count(), NUM_CELLS);
        assert_eq!(Pos::from_index(NUM_CELLS), None);
    }

    #[test]
    fn test_offset_far_off_board() {
        assert_eq!(Pos::new(1, 1).offset(1, -1), Some(Pos::new(2, 0)));
        assert_eq!(Pos::new(2, 0).offset(1, 0), None);
        assert_eq!(Pos::new(i8::MAX, 0).offset(1, 0), None);
        assert_eq!(Pos::new(0, i8::MIN).offset(0, -1), None);
    }

    #[test]
    fn test_mirror() {
        assert_eq!(Pos::new(0, 0).mirrored(), Pos::new(2, 3));
        assert_eq!(Pos::new(1, 2).mirrored(), Pos::new(1, 1));
    }

    #[test]
    fn test_rows() {
        assert_eq!(far_row(Player::Bottom), 0);
        assert_eq!(far_row(Player::Top), 3);
        assert_eq!(home_row(Player::Bottom), 3);
    }
}
