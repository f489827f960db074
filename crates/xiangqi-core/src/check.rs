//! Check detection by scanning outward from the king.

use crate::movegen::{ADVISOR_DELTA, KING_DELTA};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::side::Side;

/// Squares a checking knight can stand on, grouped by the diagonal leg
/// square (in `ADVISOR_DELTA` order) that must be empty for the check.
const KNIGHT_CHECK_DELTA: [[i8; 2]; 4] = [[-33, -18], [-31, -14], [14, 31], [18, 33]];

impl Position {
    /// Whether the side to move is in check.
    ///
    /// Two kings facing each other on an open file counts as check: the
    /// rook ray from the king finds the enemy king.
    pub fn in_check(&self) -> bool {
        self.king_in_check(self.side)
    }

    /// Whether `side`'s king is attacked, regardless of who is to move.
    pub(crate) fn king_in_check(&self, side: Side) -> bool {
        let Some(king) = self.king_square(side) else {
            return false;
        };
        let enemy = !side;
        let pawn = Piece::new(PieceKind::Pawn, enemy);
        let knight = Piece::new(PieceKind::Knight, enemy);
        let rook = Piece::new(PieceKind::Rook, enemy);
        let cannon = Piece::new(PieceKind::Cannon, enemy);
        let enemy_king = Piece::new(PieceKind::King, enemy);

        // Pawns: straight ahead or beside the king.
        if self.piece_at(king.offset(side.forward())) == pawn
            || self.piece_at(king.offset(-1)) == pawn
            || self.piece_at(king.offset(1)) == pawn
        {
            return true;
        }

        // Knights: the leg next to the knight is diagonal to the king.
        for (leg, sources) in ADVISOR_DELTA.iter().zip(KNIGHT_CHECK_DELTA) {
            if !self.piece_at(king.offset(*leg)).is_empty() {
                continue;
            }
            if sources.iter().any(|&delta| self.piece_at(king.offset(delta)) == knight) {
                return true;
            }
        }

        // Rooks, the facing king, and cannons behind exactly one screen.
        for delta in KING_DELTA {
            let mut sq = king.offset(delta);
            while sq.on_board() && self.piece_at(sq).is_empty() {
                sq = sq.offset(delta);
            }
            if !sq.on_board() {
                continue;
            }
            let first = self.piece_at(sq);
            if first == rook || first == enemy_king {
                return true;
            }
            sq = sq.offset(delta);
            while sq.on_board() && self.piece_at(sq).is_empty() {
                sq = sq.offset(delta);
            }
            if sq.on_board() && self.piece_at(sq) == cannon {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::chess_move::Move;
    use crate::position::Position;

    fn checked(fen: &str) -> bool {
        fen.parse::<Position>().unwrap().in_check()
    }

    #[test]
    fn starting_position_is_quiet() {
        assert!(!Position::starting_position().in_check());
    }

    #[test]
    fn facing_kings_is_check() {
        // Moving the only screen off the file exposes the mover's king.
        let mut red: Position = "4k4/9/9/9/9/9/9/9/4N4/4K4 w".parse().unwrap();
        assert!(!red.in_check());
        assert!(!red.make(Move::from_iccs("e1c2").unwrap()));

        let mut black: Position = "4k4/4n4/9/9/9/9/9/9/9/4K4 b".parse().unwrap();
        assert!(!black.in_check());
        assert!(!black.make(Move::from_iccs("e8c7").unwrap()));

        assert!(!checked("4k4/9/9/9/4p4/9/9/9/9/4K4 w"));
    }

    #[test]
    fn rook_check_stops_at_blockers() {
        assert!(checked("4k4/9/9/9/9/9/9/9/9/r2K5 w"));
        assert!(!checked("4k4/9/9/9/9/9/9/9/9/rN1K5 w"));
    }

    #[test]
    fn cannon_needs_exactly_one_screen() {
        assert!(!checked("4k4/9/9/9/9/9/9/9/9/c2K5 w"));
        assert!(checked("4k4/9/9/9/9/9/9/9/9/cN1K5 w"));
        assert!(!checked("4k4/9/9/9/9/9/9/9/9/cNNK5 w"));
    }

    #[test]
    fn knight_check_respects_the_leg() {
        assert!(checked("4k4/9/9/9/9/9/9/9/1n7/3K5 w"));
        assert!(!checked("4k4/9/9/9/9/9/9/9/1nP6/3K5 w"));
    }

    #[test]
    fn pawn_checks_forward_and_sideways_only() {
        assert!(checked("4k4/9/9/9/9/9/9/9/3p5/3K5 w"));
        assert!(checked("4k4/9/9/9/9/9/9/9/9/3Kp4 w"));
        assert!(!checked("4k4/9/9/9/9/9/9/9/2p6/3K5 w"));
        assert!(!checked("4k4/9/9/9/9/9/9/9/3K5/3p5 w"));
    }
}
