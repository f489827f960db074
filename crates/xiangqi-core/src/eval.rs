//! Static evaluation and the score constants shared with the search.

use crate::position::Position;

/// Score of being mated at the root.
pub const MATE_VALUE: i32 = 10_000;
/// Scores beyond this (but below a mate) mark a perpetual-check loss.
pub const BAN_VALUE: i32 = MATE_VALUE - 100;
/// Scores beyond this are decided games.
pub const WIN_VALUE: i32 = MATE_VALUE - 200;
/// Magnitude of a draw; its sign alternates with ply parity.
pub const DRAW_VALUE: i32 = 20;
/// Tempo bonus for the side to move.
pub const ADVANCED_VALUE: i32 = 3;
/// Minimum own score for trying a null move.
pub const NULL_OKAY_MARGIN: i32 = 200;
/// Own score above which a failed-high null move needs no verification.
pub const NULL_SAFE_MARGIN: i32 = 400;

impl Position {
    /// Static score for the side to move.
    ///
    /// Never equal to [`draw_value`](Position::draw_value), so a stored
    /// evaluation can't be mistaken for a repetition draw.
    pub fn evaluate(&self) -> i32 {
        let own = self.score(self.side);
        let opp = self.score(!self.side);
        let value = own - opp + ADVANCED_VALUE;
        if value == self.draw_value() { value - 1 } else { value }
    }

    /// Score of being mated at the current distance from the root.
    #[inline]
    pub fn mate_value(&self) -> i32 {
        self.distance as i32 - MATE_VALUE
    }

    /// Draw score at the current distance.
    #[inline]
    pub fn draw_value(&self) -> i32 {
        if self.distance & 1 == 0 { -DRAW_VALUE } else { DRAW_VALUE }
    }

    /// Enough material to try a null move.
    #[inline]
    pub fn null_okay(&self) -> bool {
        self.score(self.side) > NULL_OKAY_MARGIN
    }

    /// Enough material that a null-move cutoff can be trusted unverified.
    #[inline]
    pub fn null_safe(&self) -> bool {
        self.score(self.side) > NULL_SAFE_MARGIN
    }
}
