//! Xiangqi piece kinds.

use std::fmt;

/// The kind of a piece, without side information.
///
/// The discriminant is the low three bits of a packed [`Piece`](crate::Piece).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    King = 0,
    Advisor = 1,
    Bishop = 2,
    Knight = 3,
    Rook = 4,
    Cannon = 5,
    Pawn = 6,
}

impl PieceKind {
    /// Total number of piece kinds.
    pub const COUNT: usize = 7;

    /// All piece kinds in index order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::King,
        PieceKind::Advisor,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Cannon,
        PieceKind::Pawn,
    ];

    /// Return the index (0..7).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decode the low three bits of a packed piece.
    #[inline]
    pub(crate) const fn from_bits(bits: u8) -> PieceKind {
        match bits & 0x07 {
            0 => PieceKind::King,
            1 => PieceKind::Advisor,
            2 => PieceKind::Bishop,
            3 => PieceKind::Knight,
            4 => PieceKind::Rook,
            5 => PieceKind::Cannon,
            _ => PieceKind::Pawn,
        }
    }

    /// Return the FEN character for this piece kind (lowercase).
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::King => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Rook => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Pawn => 'p',
        }
    }

    /// Parse a FEN character (case-insensitive) into a piece kind.
    ///
    /// Accepts the elephant (`e`) and horse (`h`) spellings some tools emit.
    #[inline]
    pub fn from_fen_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceKind::King),
            'a' => Some(PieceKind::Advisor),
            'b' | 'e' => Some(PieceKind::Bishop),
            'n' | 'h' => Some(PieceKind::Knight),
            'r' => Some(PieceKind::Rook),
            'c' => Some(PieceKind::Cannon),
            'p' => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    /// Most-valuable-victim weight used to order captures.
    #[inline]
    pub const fn mvv_value(self) -> i32 {
        match self {
            PieceKind::King => 50,
            PieceKind::Advisor | PieceKind::Bishop => 10,
            PieceKind::Knight | PieceKind::Cannon => 30,
            PieceKind::Rook => 40,
            PieceKind::Pawn => 20,
        }
    }

    /// Maximum number of pieces of this kind one side may own.
    pub const fn max_count(self) -> usize {
        match self {
            PieceKind::King => 1,
            PieceKind::Pawn => 5,
            _ => 2,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

#[cfg(test)]
mod tests {
    use super::PieceKind;

    #[test]
    fn bits_roundtrip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_bits(kind as u8), kind);
        }
    }

    #[test]
    fn fen_char_roundtrip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_fen_char(kind.fen_char()), Some(kind));
            assert_eq!(
                PieceKind::from_fen_char(kind.fen_char().to_ascii_uppercase()),
                Some(kind)
            );
        }
    }

    #[test]
    fn alternate_spellings() {
        assert_eq!(PieceKind::from_fen_char('e'), Some(PieceKind::Bishop));
        assert_eq!(PieceKind::from_fen_char('H'), Some(PieceKind::Knight));
        assert_eq!(PieceKind::from_fen_char('q'), None);
        assert_eq!(PieceKind::from_fen_char('1'), None);
    }

    #[test]
    fn king_is_the_most_valuable_victim() {
        for kind in PieceKind::ALL {
            assert!(kind.mvv_value() <= PieceKind::King.mvv_value());
        }
        assert!(PieceKind::Rook.mvv_value() > PieceKind::Cannon.mvv_value());
    }
}
