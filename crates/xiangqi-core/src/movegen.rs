//! Pseudo-legal move generation.
//!
//! Legality is never decided here: callers confirm a move by calling
//! [`Position::make`] and checking its result.

use std::ops::Index;

use crate::chess_move::Move;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// Capacity of a [`MoveList`]; no Xiangqi position comes close.
pub const MAX_MOVES: usize = 256;

/// Orthogonal one-step offsets (also the rook and cannon ray directions).
pub(crate) const KING_DELTA: [i8; 4] = [-16, -1, 1, 16];

/// Diagonal one-step offsets (advisor steps and bishop eyes).
pub(crate) const ADVISOR_DELTA: [i8; 4] = [-17, -15, 15, 17];

/// Knight destinations grouped by the orthogonal leg in `KING_DELTA` order.
const KNIGHT_DELTA: [[i8; 2]; 4] = [[-33, -31], [-18, 14], [-14, 18], [31, 33]];

/// A generated move and its ordering value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoredMove {
    pub mv: Move,
    pub value: i32,
}

/// A fixed-capacity list of scored moves.
pub struct MoveList {
    entries: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Create an empty move list.
    pub fn new() -> Self {
        Self {
            entries: [ScoredMove::default(); MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, value: i32) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        if self.len < MAX_MOVES {
            self.entries[self.len] = ScoredMove { mv, value };
            self.len += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[ScoredMove] {
        &self.entries[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [ScoredMove] {
        &mut self.entries[..self.len]
    }

    /// Iterate over the moves without their values.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.as_slice().iter().map(|entry| entry.mv)
    }

    /// Whether the list contains `mv`.
    pub fn contains(&self, mv: Move) -> bool {
        self.moves().any(|m| m == mv)
    }

    /// Stable sort, highest value first.
    pub fn sort_by_value(&mut self) {
        self.as_mut_slice().sort_by(|a, b| b.value.cmp(&a.value));
    }

    /// Keep only the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for MoveList {
    type Output = ScoredMove;

    fn index(&self, index: usize) -> &ScoredMove {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a ScoredMove;
    type IntoIter = std::slice::Iter<'a, ScoredMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.moves()).finish()
    }
}

impl Position {
    /// Generate pseudo-legal moves for the side to move.
    ///
    /// With `captures_only` every entry captures an enemy piece and carries
    /// its most-valuable-victim weight; otherwise all moves are emitted with
    /// value 0.
    pub fn generate(&self, captures_only: bool) -> MoveList {
        let mut list = MoveList::new();
        for src in Square::all() {
            if self.piece_at(src).belongs_to(self.side) {
                self.generate_from(src, captures_only, &mut list);
            }
        }
        list
    }

    /// Whether `mv` is a pseudo-legal move for the side to move.
    ///
    /// Answered by the generator itself, so the two can never disagree.
    pub fn is_pseudo_legal(&self, mv: Move) -> bool {
        let src = mv.source();
        if mv.is_null() || !src.on_board() || !self.piece_at(src).belongs_to(self.side) {
            return false;
        }
        let mut list = MoveList::new();
        self.generate_from(src, false, &mut list);
        list.contains(mv)
    }

    /// Emit `src -> dst` unless a friendly piece blocks it (or, for
    /// captures-only generation, unless it does not capture).
    #[inline]
    fn push_step(&self, src: Square, dst: Square, captures_only: bool, list: &mut MoveList) {
        let target = self.piece_at(dst);
        if captures_only {
            if target.belongs_to(!self.side) {
                list.push(Move::new(src, dst), target.kind().mvv_value());
            }
        } else if !target.belongs_to(self.side) {
            list.push(Move::new(src, dst), 0);
        }
    }

    fn generate_from(&self, src: Square, captures_only: bool, list: &mut MoveList) {
        let side = self.side;
        match self.piece_at(src).kind() {
            PieceKind::King => {
                for delta in KING_DELTA {
                    let dst = src.offset(delta);
                    if dst.in_palace() {
                        self.push_step(src, dst, captures_only, list);
                    }
                }
            }
            PieceKind::Advisor => {
                for delta in ADVISOR_DELTA {
                    let dst = src.offset(delta);
                    if dst.in_palace() {
                        self.push_step(src, dst, captures_only, list);
                    }
                }
            }
            PieceKind::Bishop => {
                for delta in ADVISOR_DELTA {
                    let eye = src.offset(delta);
                    if !(eye.on_board() && eye.home_half(side) && self.piece_at(eye).is_empty()) {
                        continue;
                    }
                    let dst = eye.offset(delta);
                    if dst.on_board() {
                        self.push_step(src, dst, captures_only, list);
                    }
                }
            }
            PieceKind::Knight => {
                for (leg, targets) in KING_DELTA.iter().zip(KNIGHT_DELTA) {
                    if !self.piece_at(src.offset(*leg)).is_empty() {
                        continue;
                    }
                    for delta in targets {
                        let dst = src.offset(delta);
                        if dst.on_board() {
                            self.push_step(src, dst, captures_only, list);
                        }
                    }
                }
            }
            PieceKind::Rook => {
                for delta in KING_DELTA {
                    let mut dst = src.offset(delta);
                    while dst.on_board() {
                        let target = self.piece_at(dst);
                        if target.is_empty() {
                            if !captures_only {
                                list.push(Move::new(src, dst), 0);
                            }
                        } else {
                            if target.belongs_to(!side) {
                                list.push(Move::new(src, dst), target.kind().mvv_value());
                            }
                            break;
                        }
                        dst = dst.offset(delta);
                    }
                }
            }
            PieceKind::Cannon => {
                for delta in KING_DELTA {
                    let mut dst = src.offset(delta);
                    while dst.on_board() && self.piece_at(dst).is_empty() {
                        if !captures_only {
                            list.push(Move::new(src, dst), 0);
                        }
                        dst = dst.offset(delta);
                    }
                    // `dst` is now the screen (or off the board); look past it.
                    if !dst.on_board() {
                        continue;
                    }
                    dst = dst.offset(delta);
                    while dst.on_board() {
                        let target = self.piece_at(dst);
                        if !target.is_empty() {
                            if target.belongs_to(!side) {
                                list.push(Move::new(src, dst), target.kind().mvv_value());
                            }
                            break;
                        }
                        dst = dst.offset(delta);
                    }
                }
            }
            PieceKind::Pawn => {
                let dst = src.offset(side.forward());
                if dst.on_board() {
                    self.push_step(src, dst, captures_only, list);
                }
                if !src.home_half(side) {
                    for delta in [-1, 1] {
                        let dst = src.offset(delta);
                        if dst.on_board() {
                            self.push_step(src, dst, captures_only, list);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(list: &MoveList, iccs: &str) -> bool {
        list.contains(Move::from_iccs(iccs).unwrap())
    }

    #[test]
    fn starting_position_has_44_moves() {
        let pos = Position::starting_position();
        assert_eq!(pos.generate(false).len(), 44);
        assert!(pos.generate(true).len() == 2, "only the two cannon captures");
    }

    #[test]
    fn cannon_captures_over_exactly_one_screen() {
        let pos: Position = "5k3/9/4n4/9/4P4/9/9/4C4/9/3K5 w".parse().unwrap();
        let moves = pos.generate(false);
        assert!(has(&moves, "e2e7"), "capture over one screen");
        assert!(has(&moves, "e2e4"), "quiet slide up to the screen");
        assert!(!has(&moves, "e2e5"), "cannot take the screen itself");
        assert!(!has(&moves, "e2e6"));
        let captures = pos.generate(true);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].value, PieceKind::Knight.mvv_value());
    }

    #[test]
    fn cannon_without_screen_cannot_capture() {
        let pos: Position = "5k3/9/4n4/9/9/9/9/4C4/9/3K5 w".parse().unwrap();
        let moves = pos.generate(false);
        assert!(!has(&moves, "e2e7"));
        assert!(has(&moves, "e2e6"));
        assert!(pos.generate(true).is_empty());
    }

    #[test]
    fn cannon_with_two_screens_takes_the_nearer_target() {
        let pos: Position = "5k3/9/4n4/4p4/4P4/9/9/4C4/9/3K5 w".parse().unwrap();
        let moves = pos.generate(false);
        assert!(!has(&moves, "e2e7"));
        assert!(has(&moves, "e2e6"));
    }

    #[test]
    fn blocked_knight_leg() {
        // The pawn on b1 hobbles the knight's upward jumps.
        let pos: Position = "4k4/9/9/9/9/9/9/9/1P7/1N1K5 w".parse().unwrap();
        let moves = pos.generate(false);
        assert!(!has(&moves, "b0a2"));
        assert!(!has(&moves, "b0c2"));
        assert!(has(&moves, "b0d1"));
    }

    #[test]
    fn bishop_eye_and_river() {
        // The pawn on d3 fills the eye toward c2, and the river bars the upward jumps.
        let pos: Position = "4k4/9/9/9/9/4B4/3P5/9/9/4K4 w".parse().unwrap();
        let moves = pos.generate(false);
        assert!(has(&moves, "e4g2"));
        assert!(!has(&moves, "e4c2"));
        assert!(!has(&moves, "e4c6"));
        assert!(!has(&moves, "e4g6"));
    }

    #[test]
    fn pawn_moves_sideways_only_after_the_river() {
        let home: Position = "4k4/9/9/9/9/9/4P4/9/9/3K5 w".parse().unwrap();
        let moves = home.generate(false);
        assert!(has(&moves, "e3e4"));
        assert!(!has(&moves, "e3d3"));

        let crossed: Position = "4k4/9/9/9/4P4/9/9/9/9/3K5 w".parse().unwrap();
        let moves = crossed.generate(false);
        assert!(has(&moves, "e5e6"));
        assert!(has(&moves, "e5d5"));
        assert!(has(&moves, "e5f5"));
        assert!(!has(&moves, "e5e4"));
    }

    #[test]
    fn king_and_advisor_stay_in_the_palace() {
        let pos: Position = "4k4/9/9/9/9/9/9/3A5/9/5K3 w".parse().unwrap();
        let moves = pos.generate(false);
        assert!(has(&moves, "d2e1"));
        assert!(!has(&moves, "d2c1"));
        assert!(!has(&moves, "f0g0"));
        assert!(has(&moves, "f0e0"));
    }

    #[test]
    fn pseudo_legality_agrees_with_generation() {
        let pos = Position::starting_position();
        for entry in &pos.generate(false) {
            assert!(pos.is_pseudo_legal(entry.mv));
        }
        assert!(!pos.is_pseudo_legal(Move::NULL));
        assert!(!pos.is_pseudo_legal(Move::from_iccs("h9g7").unwrap()), "black piece");
        assert!(!pos.is_pseudo_legal(Move::from_iccs("a0a5").unwrap()), "rook jumps its pawn");
    }

    #[test]
    fn sort_by_value_is_descending() {
        let mut list = MoveList::new();
        let mv = Move::from_iccs("a0a1").unwrap();
        list.push(mv, 3);
        list.push(mv, 9);
        list.push(mv, 5);
        list.sort_by_value();
        let values: Vec<i32> = list.as_slice().iter().map(|e| e.value).collect();
        assert_eq!(values, vec![9, 5, 3]);
        list.truncate(1);
        assert_eq!(list.len(), 1);
    }
}
