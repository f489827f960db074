//! Move representation, packed into a u16.

use std::fmt;

use crate::square::Square;

/// A move encoded as `source | dest << 8` over padded square indices.
///
/// The all-zero value is the null move: square 0 is off the board, so no
/// real move can ever encode to it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// Null move sentinel. Never a legal move.
    pub const NULL: Move = Move(0);

    /// Create a move between two squares.
    #[inline]
    pub const fn new(source: Square, dest: Square) -> Move {
        Move(source.raw() as u16 | (dest.raw() as u16) << 8)
    }

    /// Reconstruct a move from its raw encoding.
    #[inline]
    pub const fn from_raw(raw: u16) -> Move {
        Move(raw)
    }

    /// Create a move from external `(row, col)` coordinates.
    pub fn from_coords(from: (usize, usize), to: (usize, usize)) -> Option<Move> {
        Some(Move::new(
            Square::from_coords(from.0, from.1)?,
            Square::from_coords(to.0, to.1)?,
        ))
    }

    /// Parse an ICCS move such as `h2e2`.
    pub fn from_iccs(s: &str) -> Option<Move> {
        if s.len() != 4 || !s.is_ascii() {
            return None;
        }
        Some(Move::new(
            Square::from_iccs(&s[0..2])?,
            Square::from_iccs(&s[2..4])?,
        ))
    }

    #[inline]
    pub const fn source(self) -> Square {
        Square::from_raw((self.0 & 0xff) as u8)
    }

    #[inline]
    pub const fn dest(self) -> Square {
        Square::from_raw((self.0 >> 8) as u8)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// External `(row, col)` coordinates of the source and destination.
    pub const fn coords(self) -> ((usize, usize), (usize, usize)) {
        (self.source().coords(), self.dest().coords())
    }

    /// ICCS text, `0000` for the null move.
    pub fn to_iccs(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.source(), self.dest())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}
