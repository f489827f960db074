//! Repetition and perpetual-check detection over the undo stack.

use crate::eval::BAN_VALUE;
use crate::position::Position;

/// Bitmask describing a detected repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepetitionStatus(u8);

impl RepetitionStatus {
    /// No repetition.
    pub const NONE: RepetitionStatus = RepetitionStatus(0);

    const FOUND: u8 = 1;
    const SELF_PERPETUAL: u8 = 2;
    const OPPONENT_PERPETUAL: u8 = 4;

    const fn new(self_perpetual: bool, opponent_perpetual: bool) -> RepetitionStatus {
        let mut bits = Self::FOUND;
        if self_perpetual {
            bits |= Self::SELF_PERPETUAL;
        }
        if opponent_perpetual {
            bits |= Self::OPPONENT_PERPETUAL;
        }
        RepetitionStatus(bits)
    }

    /// Whether the current position repeats an earlier one.
    #[inline]
    pub const fn is_repetition(self) -> bool {
        self.0 & Self::FOUND != 0
    }

    /// Every move by the side to move in the repeating run gave check.
    #[inline]
    pub const fn self_perpetual(self) -> bool {
        self.0 & Self::SELF_PERPETUAL != 0
    }

    /// Every opponent move in the repeating run gave check.
    #[inline]
    pub const fn opponent_perpetual(self) -> bool {
        self.0 & Self::OPPONENT_PERPETUAL != 0
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl Position {
    /// Look back through reversible moves for earlier occurrences of the
    /// current position.
    ///
    /// The walk stops at the first capture or null move. A repetition is
    /// reported once `required_repeats` earlier occurrences with the same
    /// side to move have been seen.
    pub fn repetition_status(&self, required_repeats: u32) -> RepetitionStatus {
        let mut remaining = required_repeats.max(1);
        let mut self_side = false;
        let mut self_perpetual = true;
        let mut opponent_perpetual = true;

        for record in self.history.iter().rev() {
            if record.mv.is_null() || !record.captured.is_empty() {
                break;
            }
            if self_side {
                self_perpetual &= record.checking;
                if record.key == self.hash.key {
                    remaining -= 1;
                    if remaining == 0 {
                        return RepetitionStatus::new(self_perpetual, opponent_perpetual);
                    }
                }
            } else {
                opponent_perpetual &= record.checking;
            }
            self_side = !self_side;
        }
        RepetitionStatus::NONE
    }

    /// Score of a repeated position for the side to move.
    ///
    /// Perpetual check loses for the checking side; anything else is a draw.
    pub fn rep_value(&self, status: RepetitionStatus) -> i32 {
        let distance = self.distance as i32;
        let mut value = 0;
        if status.self_perpetual() {
            value += distance - BAN_VALUE;
        }
        if status.opponent_perpetual() {
            value += BAN_VALUE - distance;
        }
        if value == 0 { self.draw_value() } else { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::WIN_VALUE;

    fn play_all(pos: &mut Position, moves: &[&str]) {
        for mv in moves {
            pos.play_iccs(mv).unwrap();
        }
    }

    // Red rook shuttles between a8 and a9 checking the black king, which
    // shuttles between d9 and d8.
    const PERPETUAL_FEN: &str = "3k5/R8/9/9/9/9/9/9/9/5K3 w";
    const PERPETUAL_CYCLE: [&str; 4] = ["a8a9", "d9d8", "a9a8", "d8d9"];

    // Nobody gives check: rook a0-a1 against king f9-f8.
    const QUIET_FEN: &str = "5k3/9/9/9/9/9/9/9/9/R2K5 w";
    const QUIET_CYCLE: [&str; 4] = ["a0a1", "f9f8", "a1a0", "f8f9"];

    #[test]
    fn no_history_no_repetition() {
        let pos = Position::starting_position();
        assert_eq!(pos.repetition_status(1), RepetitionStatus::NONE);
    }

    #[test]
    fn quiet_cycle_is_a_draw() {
        let mut pos: Position = QUIET_FEN.parse().unwrap();
        play_all(&mut pos, &QUIET_CYCLE);
        let status = pos.repetition_status(1);
        assert!(status.is_repetition());
        assert!(!status.self_perpetual());
        assert!(!status.opponent_perpetual());
        assert_eq!(pos.rep_value(status), pos.draw_value());
    }

    #[test]
    fn third_occurrence_needs_two_repeats() {
        let mut pos: Position = QUIET_FEN.parse().unwrap();
        play_all(&mut pos, &QUIET_CYCLE);
        assert!(!pos.repetition_status(2).is_repetition());
        play_all(&mut pos, &QUIET_CYCLE);
        assert!(pos.repetition_status(2).is_repetition());
        assert!(!pos.repetition_status(3).is_repetition());
    }

    #[test]
    fn perpetual_check_loses_for_the_checker() {
        let mut pos: Position = PERPETUAL_FEN.parse().unwrap();
        play_all(&mut pos, &PERPETUAL_CYCLE);

        // Red to move, and every red move in the cycle gave check.
        let status = pos.repetition_status(1);
        assert_eq!(status.bits(), 3);
        let value = pos.rep_value(status);
        assert!(value < -WIN_VALUE, "perpetual checker scores {value}");
    }

    #[test]
    fn perpetual_check_wins_for_the_victim() {
        let mut pos: Position = PERPETUAL_FEN.parse().unwrap();
        play_all(&mut pos, &PERPETUAL_CYCLE);
        play_all(&mut pos, &PERPETUAL_CYCLE[..3]);

        // Black to move, red has checked on every move.
        let status = pos.repetition_status(1);
        assert!(status.is_repetition());
        assert!(!status.self_perpetual());
        assert!(status.opponent_perpetual());
        assert!(pos.rep_value(status) > WIN_VALUE);
    }

    #[test]
    fn capture_breaks_the_chain() {
        let mut pos: Position = "5k3/9/9/9/9/9/9/9/p8/R2K5 w".parse().unwrap();
        play_all(&mut pos, &["a0a1", "f9f8", "a1a0", "f8f9"]);
        assert_eq!(pos.repetition_status(1), RepetitionStatus::NONE);
    }
}
