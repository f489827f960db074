//! Sided Xiangqi piece, packed into a single byte.

use std::fmt;

use crate::piece_kind::PieceKind;
use crate::side::Side;

/// A sided piece, or the empty marker.
///
/// Bit layout:
/// - bits 0-2: [`PieceKind`] (values 0-6)
/// - bit 3: set for Red pieces
/// - bit 4: set for Black pieces
///
/// Red pieces are 8-14, Black pieces 16-22, and 0 is an empty square.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Piece(u8);

impl Piece {
    /// Number of distinct non-empty pieces.
    pub const COUNT: usize = 14;

    /// The empty square marker.
    pub const EMPTY: Piece = Piece(0);

    /// Create a piece from a kind and a side.
    #[inline]
    pub const fn new(kind: PieceKind, side: Side) -> Piece {
        Piece(side.tag() | kind as u8)
    }

    /// Parse a FEN character into a piece.
    ///
    /// Uppercase letters produce Red pieces; lowercase letters produce Black pieces.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_fen_char(c)?;
        let side = if c.is_ascii_uppercase() {
            Side::Red
        } else {
            Side::Black
        };
        Some(Piece::new(kind, side))
    }

    /// Whether this is the empty marker.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether this piece belongs to `side`. Always false for the empty marker.
    #[inline]
    pub const fn belongs_to(self, side: Side) -> bool {
        self.0 & side.tag() != 0
    }

    /// Return the piece kind. Meaningless for the empty marker.
    #[inline]
    pub const fn kind(self) -> PieceKind {
        PieceKind::from_bits(self.0)
    }

    /// Return the owning side, or `None` for the empty marker.
    #[inline]
    pub const fn side(self) -> Option<Side> {
        if self.belongs_to(Side::Red) {
            Some(Side::Red)
        } else if self.belongs_to(Side::Black) {
            Some(Side::Black)
        } else {
            None
        }
    }

    /// Contiguous index 0-13 for table lookups: Red 0-6, Black 7-13.
    #[inline]
    pub const fn index(self) -> usize {
        let kind = (self.0 & 0x07) as usize;
        if self.0 & 0x10 != 0 { kind + 7 } else { kind }
    }

    /// Return the raw packed byte.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Return the FEN character, uppercase for Red.
    pub fn fen_char(self) -> char {
        match self.side() {
            Some(Side::Red) => self.kind().fen_char().to_ascii_uppercase(),
            Some(Side::Black) => self.kind().fen_char(),
            None => '.',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side() {
            Some(Side::Red) => write!(f, "R{}", self.kind().fen_char().to_ascii_uppercase()),
            Some(Side::Black) => write!(f, "B{}", self.kind().fen_char().to_ascii_uppercase()),
            None => write!(f, "--"),
        }
    }
}
