//! Piece kind definitions

use serde::{Deserialize, Serialize};

/// Movement offset (dx, dy) in Bottom's orientation, where forward is -y
pub type Offset = (i8, i8);

#[rustfmt::skip]
const KING_OFFSETS: &[Offset] = &[
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];
const HEAVY_OFFSETS: &[Offset] = &[(0, -1), (-1, 0), (1, 0), (0, 1)];
const LIGHT_OFFSETS: &[Offset] = &[(-1, -1), (1, -1), (-1, 1), (1, 1)];
const FORWARD_OFFSETS: &[Offset] = &[(0, -1)];
#[rustfmt::skip]
const PROMOTED_OFFSETS: &[Offset] = &[
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
              (0, 1),
];

/// Piece kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    /// Lion
    King,
    /// Giraffe
    Heavy,
    /// Elephant
    Light,
    /// Chick
    Forward,
    /// Hen
    ForwardPromoted,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::King,
        PieceKind::Heavy,
        PieceKind::Light,
        PieceKind::Forward,
        PieceKind::ForwardPromoted,
    ];

    /// One-step offsets in Bottom's orientation
    pub fn offsets(self) -> &'static [Offset] {
        match self {
            PieceKind::King => KING_OFFSETS,
            PieceKind::Heavy => HEAVY_OFFSETS,
            PieceKind::Light => LIGHT_OFFSETS,
            PieceKind::Forward => FORWARD_OFFSETS,
            PieceKind::ForwardPromoted => PROMOTED_OFFSETS,
        }
    }

    pub fn is_king(self) -> bool {
        self == PieceKind::King
    }

    /// Kind after reaching the far row
    pub fn promoted(self) -> Self {
        match self {
            PieceKind::Forward => PieceKind::ForwardPromoted,
            other => other,
        }
    }

    /// Kind after being captured
    pub fn demoted(self) -> Self {
        match self {
            PieceKind::ForwardPromoted => PieceKind::Forward,
            other => other,
        }
    }

    /// Single-letter id used in text output
    pub fn id(self) -> &'static str {
        match self {
            PieceKind::King => "L",
            PieceKind::Heavy => "G",
            PieceKind::Light => "E",
            PieceKind::Forward => "C",
            PieceKind::ForwardPromoted => "H",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::King => "Lion",
            PieceKind::Heavy => "Giraffe",
            PieceKind::Light => "Elephant",
            PieceKind::Forward => "Chick",
            PieceKind::ForwardPromoted => "Hen",
        }
    }

    /// Look up a kind by its letter id (case-insensitive)
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_lookup() {
        assert_eq!(PieceKind::from_id("L"), Some(PieceKind::King));
        assert_eq!(PieceKind::from_id("c"), Some(PieceKind::Forward));
        assert_eq!(PieceKind::from_id("X"), None);
    }

    #[test]
    fn test_promotion_only_toggles_chick() {
        assert_eq!(PieceKind::Forward.promoted(), PieceKind::ForwardPromoted);
        assert_eq!(PieceKind::ForwardPromoted.demoted(), PieceKind::Forward);
        for kind in [PieceKind::King, PieceKind::Heavy, PieceKind::Light] {
            assert_eq!(kind.promoted(), kind);
            assert_eq!(kind.demoted(), kind);
        }
    }

    #[test]
    fn test_offset_tables() {
        assert_eq!(PieceKind::King.offsets().len(), 8);
        assert_eq!(PieceKind::Heavy.offsets().len(), 4);
        assert_eq!(PieceKind::Light.offsets().len(), 4);
        assert_eq!(PieceKind::Forward.offsets(), &[(0i8, -1i8)][..]);
        // Hen cannot step diagonally backward
        let hen = PieceKind::ForwardPromoted.offsets();
        assert!(!hen.contains(&(-1, 1)));
        assert!(!hen.contains(&(1, 1)));
        assert!(hen.contains(&(0, 1)));
    }
}
