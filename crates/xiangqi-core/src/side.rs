//! The two sides of a Xiangqi game.

use std::fmt;
use std::ops::Not;

/// A side: Red moves first and sits at the bottom of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    Red = 0,
    Black = 1,
}

impl Side {
    /// Total number of sides.
    pub const COUNT: usize = 2;

    /// All sides in index order.
    pub const ALL: [Side; 2] = [Side::Red, Side::Black];

    /// Return the index (0 for Red, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Return the opposite side.
    #[inline]
    pub const fn flip(self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Base value of this side's piece range (8 for Red, 16 for Black).
    ///
    /// A piece belongs to a side exactly when `raw & tag != 0`.
    #[inline]
    pub const fn tag(self) -> u8 {
        8 << (self as u8)
    }

    /// Square offset of a forward pawn step.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Side::Red => -16,
            Side::Black => 16,
        }
    }
}

impl Not for Side {
    type Output = Side;

    #[inline]
    fn not(self) -> Side {
        self.flip()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "w"),
            Side::Black => write!(f, "b"),
        }
    }
}
