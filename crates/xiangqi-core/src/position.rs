//! Mutable Xiangqi position with incremental score, hash and undo stacks.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::chess_move::Move;
use crate::error::{BoardError, MoveError, SnapshotError, side_name};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::pst;
use crate::side::Side;
use crate::snapshot::BoardSnapshot;
use crate::square::{COLS, ROWS, Square};
use crate::zobrist::ZobristHash;

/// One entry of the undo stack.
///
/// `key` is the hash key *before* the move, and `checking` records whether
/// the side to move after it stands in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlyRecord {
    pub(crate) mv: Move,
    pub(crate) captured: Piece,
    pub(crate) key: u64,
    pub(crate) checking: bool,
}

/// A Xiangqi position, mutated in place by [`make`](Position::make) and
/// restored by [`undo`](Position::undo).
///
/// Board contents, the per-side scores and the hash only ever change
/// together, through the private add/remove primitives.
#[derive(Clone)]
pub struct Position {
    pub(crate) squares: [Piece; 256],
    pub(crate) side: Side,
    pub(crate) score: [i32; Side::COUNT],
    pub(crate) hash: ZobristHash,
    pub(crate) distance: usize,
    pub(crate) history: Vec<PlyRecord>,
}

impl Position {
    /// A board with no pieces and Red to move.
    pub fn empty() -> Position {
        Position {
            squares: [Piece::EMPTY; 256],
            side: Side::Red,
            score: [0; Side::COUNT],
            hash: ZobristHash::default(),
            distance: 0,
            history: vec![PlyRecord {
                mv: Move::NULL,
                captured: Piece::EMPTY,
                key: 0,
                checking: false,
            }],
        }
    }

    /// The standard opening position.
    pub fn starting_position() -> Position {
        let mut pos = Position::empty();
        pos.load(&BoardSnapshot::starting_position());
        pos
    }

    /// Build a position from an external snapshot, validating it first.
    ///
    /// Besides the structural checks of [`BoardSnapshot::validate`], the
    /// side that just moved must not be left in check.
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Result<Position, BoardError> {
        snapshot.validate()?;
        let mut pos = Position::empty();
        pos.load(snapshot);
        let waiting = !pos.side;
        if pos.king_in_check(waiting) {
            return Err(BoardError::OpponentInCheck {
                side: side_name(waiting),
            });
        }
        trace!(fen = %snapshot, key = pos.hash.key, "position loaded");
        Ok(pos)
    }

    fn load(&mut self, snapshot: &BoardSnapshot) {
        for row in 0..ROWS {
            for col in 0..COLS {
                if let Some(piece) = snapshot.cells[row][col]
                    && !piece.is_empty()
                    && let Some(sq) = Square::from_coords(row, col)
                {
                    self.add_piece(sq, piece);
                }
            }
        }
        if snapshot.side_to_move == Side::Black {
            self.flip_side();
        }
        self.reset_history();
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.squares[sq.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.side
    }

    /// Transposition-table index key.
    #[inline]
    pub fn key(&self) -> u64 {
        self.hash.key
    }

    /// Transposition-table verification lock.
    #[inline]
    pub fn lock(&self) -> u64 {
        self.hash.lock
    }

    /// Incremental material plus positional total of one side.
    #[inline]
    pub fn score(&self, side: Side) -> i32 {
        self.score[side.index()]
    }

    /// Plies played since the search root.
    #[inline]
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Number of plies on the undo stack.
    #[inline]
    pub fn ply_count(&self) -> usize {
        self.history.len() - 1
    }

    /// Square of `side`'s king, if it has one.
    pub fn king_square(&self, side: Side) -> Option<Square> {
        let king = Piece::new(PieceKind::King, side);
        Square::all().find(|&sq| self.piece_at(sq) == king)
    }

    /// Whether the side to move was in check when the current ply began.
    ///
    /// Cheaper than [`in_check`](Position::in_check): the flag was computed
    /// once when the previous move was made.
    #[inline]
    pub fn cached_check(&self) -> bool {
        self.last_record().checking
    }

    /// Whether the last move captured a piece.
    #[inline]
    pub fn captured(&self) -> bool {
        !self.last_record().captured.is_empty()
    }

    /// The move that led to this position, or [`Move::NULL`].
    #[inline]
    pub fn last_move(&self) -> Move {
        self.last_record().mv
    }

    #[inline]
    fn last_record(&self) -> &PlyRecord {
        // The stack always holds at least the reset sentinel.
        &self.history[self.history.len() - 1]
    }

    /// Table index for the history heuristic: moving piece and destination.
    #[inline]
    pub fn history_index(&self, mv: Move) -> usize {
        self.piece_at(mv.source()).index() * 256 + mv.dest().index()
    }

    /// Extract the external snapshot of the current board.
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snapshot = BoardSnapshot::empty();
        for sq in Square::all() {
            let piece = self.piece_at(sq);
            if !piece.is_empty() {
                let (row, col) = sq.coords();
                snapshot.cells[row][col] = Some(piece);
            }
        }
        snapshot.side_to_move = self.side;
        snapshot
    }

    /// Return a pretty-printer that renders the board as a 10x9 grid.
    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }

    // ── History boundaries ──────────────────────────────────────────────

    /// Drop the undo stack, keeping only a sentinel for the current position.
    ///
    /// Called at game-move boundaries; repetition detection cannot see past it.
    pub fn reset_history(&mut self) {
        let checking = self.in_check();
        self.history.clear();
        self.history.push(PlyRecord {
            mv: Move::NULL,
            captured: Piece::EMPTY,
            key: 0,
            checking,
        });
        self.distance = 0;
    }

    /// Make the current position the search root without dropping history.
    pub fn reset_distance(&mut self) {
        self.distance = 0;
    }

    // ── Mutation primitives ─────────────────────────────────────────────

    fn add_piece(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.squares[sq.index()].is_empty());
        self.squares[sq.index()] = piece;
        if let Some(side) = piece.side() {
            self.score[side.index()] += pst::value(piece, sq);
        }
        self.hash.toggle_piece(piece, sq);
    }

    fn remove_piece(&mut self, sq: Square) -> Piece {
        let piece = self.squares[sq.index()];
        debug_assert!(!piece.is_empty());
        self.squares[sq.index()] = Piece::EMPTY;
        if let Some(side) = piece.side() {
            self.score[side.index()] -= pst::value(piece, sq);
        }
        self.hash.toggle_piece(piece, sq);
        piece
    }

    fn flip_side(&mut self) {
        self.side = !self.side;
        self.hash.toggle_side();
    }

    /// Relocate the moving piece, returning whatever stood on the destination.
    fn move_piece(&mut self, mv: Move) -> Piece {
        let captured = if self.piece_at(mv.dest()).is_empty() {
            Piece::EMPTY
        } else {
            self.remove_piece(mv.dest())
        };
        let piece = self.remove_piece(mv.source());
        self.add_piece(mv.dest(), piece);
        captured
    }

    fn unmove_piece(&mut self, mv: Move, captured: Piece) {
        let piece = self.remove_piece(mv.dest());
        self.add_piece(mv.source(), piece);
        if !captured.is_empty() {
            self.add_piece(mv.dest(), captured);
        }
    }

    // ── Make / undo ─────────────────────────────────────────────────────

    /// Play a pseudo-legal move.
    ///
    /// Returns `false` and leaves the position untouched when the move would
    /// leave the mover in check. Every `true` must be paired with one
    /// [`undo`](Position::undo).
    pub fn make(&mut self, mv: Move) -> bool {
        debug_assert!(self.piece_at(mv.source()).belongs_to(self.side));
        let key = self.hash.key;
        let captured = self.move_piece(mv);
        if self.in_check() {
            self.unmove_piece(mv, captured);
            return false;
        }
        self.flip_side();
        let checking = self.in_check();
        self.history.push(PlyRecord {
            mv,
            captured,
            key,
            checking,
        });
        self.distance += 1;
        true
    }

    /// Take back the last move played by [`make`](Position::make).
    ///
    /// Debug builds panic when nothing is left to take back; release builds
    /// leave the position unchanged.
    pub fn undo(&mut self) {
        debug_assert!(self.history.len() > 1, "undo past the history sentinel");
        debug_assert!(!self.last_move().is_null(), "undo of a null move");
        if self.history.len() <= 1 {
            return;
        }
        let record = *self.last_record();
        self.history.pop();
        self.distance = self.distance.saturating_sub(1);
        self.flip_side();
        self.unmove_piece(record.mv, record.captured);
    }

    /// Pass the turn without moving.
    pub fn make_null(&mut self) {
        let key = self.hash.key;
        self.flip_side();
        self.history.push(PlyRecord {
            mv: Move::NULL,
            captured: Piece::EMPTY,
            key,
            checking: false,
        });
        self.distance += 1;
    }

    /// Take back a [`make_null`](Position::make_null).
    ///
    /// Like [`undo`](Position::undo), a no-op at the history sentinel in
    /// release builds.
    pub fn undo_null(&mut self) {
        debug_assert!(self.history.len() > 1, "undo past the history sentinel");
        debug_assert!(self.last_move().is_null(), "undo_null of a real move");
        if self.history.len() <= 1 {
            return;
        }
        self.history.pop();
        self.distance = self.distance.saturating_sub(1);
        self.flip_side();
    }

    /// Replay a game move, rejecting anything illegal.
    ///
    /// Unlike [`make`](Position::make) this also checks the move geometry,
    /// so it is safe to call with untrusted input.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        if !self.is_pseudo_legal(mv) {
            return Err(MoveError::Illegal {
                mv: mv.to_string(),
                side: side_name(self.side),
            });
        }
        if !self.make(mv) {
            return Err(MoveError::SelfCheck {
                mv: mv.to_string(),
                side: side_name(self.side),
            });
        }
        Ok(())
    }

    /// Parse an ICCS move and [`play`](Position::play) it.
    pub fn play_iccs(&mut self, text: &str) -> Result<Move, MoveError> {
        let mv = Move::from_iccs(text).ok_or_else(|| MoveError::Unparseable {
            text: text.to_string(),
        })?;
        self.play(mv)?;
        Ok(mv)
    }

    /// All legal moves, confirmed by make/undo.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let candidates = self.generate(false);
        let mut legal = Vec::with_capacity(candidates.len());
        for mv in candidates.moves() {
            if self.make(mv) {
                self.undo();
                legal.push(mv);
            }
        }
        legal
    }

    /// Whether the side to move has no legal move at all.
    ///
    /// True for both checkmate and stalemate; Xiangqi scores both as a loss.
    pub fn is_mate(&mut self) -> bool {
        let candidates = self.generate(false);
        for mv in candidates.moves() {
            if self.make(mv) {
                self.undo();
                return false;
            }
        }
        true
    }

    /// Neither side has a rook, knight or cannon left.
    ///
    /// Pawns and piece mobility are ignored.
    pub fn insufficient_material(&self) -> bool {
        Square::all().all(|sq| {
            let piece = self.piece_at(sq);
            piece.is_empty()
                || !matches!(
                    piece.kind(),
                    PieceKind::Rook | PieceKind::Knight | PieceKind::Cannon
                )
        })
    }
}

impl FromStr for Position {
    type Err = SnapshotError;

    fn from_str(fen: &str) -> Result<Position, SnapshotError> {
        let snapshot: BoardSnapshot = fen.parse()?;
        Ok(Position::from_snapshot(&snapshot)?)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::starting_position()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{}\")", self.snapshot())
    }
}

/// Wrapper for pretty-printing a position as a 10x9 grid.
pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0.snapshot();
        for (row, cells) in snapshot.cells.iter().enumerate() {
            write!(f, "{}  ", ROWS - 1 - row)?;
            for (col, cell) in cells.iter().enumerate() {
                let c = cell.map_or('.', Piece::fen_char);
                if col + 1 < COLS {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h i")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zobrist::hash_from_scratch;

    fn assert_consistent(pos: &Position) {
        let scratch = Position::from_snapshot(&pos.snapshot()).unwrap();
        assert_eq!(pos.score, scratch.score, "score drifted");
        let hash = hash_from_scratch(pos);
        assert_eq!(pos.hash, hash, "hash drifted");
    }

    #[test]
    fn starting_position_is_balanced() {
        let pos = Position::starting_position();
        assert_eq!(pos.side_to_move(), Side::Red);
        assert_eq!(pos.score(Side::Red), pos.score(Side::Black));
        assert!(!pos.cached_check());
        assert_eq!(pos.ply_count(), 0);
        assert_consistent(&pos);
    }

    #[test]
    fn make_undo_restores_everything() {
        let mut pos = Position::starting_position();
        let before = pos.clone();
        let mv = Move::from_iccs("h2e2").unwrap();
        assert!(pos.make(mv));
        assert_eq!(pos.side_to_move(), Side::Black);
        assert_eq!(pos.distance(), 1);
        assert_eq!(pos.last_move(), mv);
        assert_consistent(&pos);
        pos.undo();
        assert_eq!(pos.squares, before.squares);
        assert_eq!(pos.score, before.score);
        assert_eq!(pos.hash, before.hash);
        assert_eq!(pos.distance(), 0);
    }

    #[test]
    fn capture_is_recorded_and_restored() {
        // Red cannon takes the knight over the b-file screen.
        let mut pos = Position::starting_position();
        let before = pos.clone();
        let mv = Move::from_iccs("b2b9").unwrap();
        assert!(pos.make(mv));
        assert!(pos.captured());
        assert!(pos.score(Side::Black) < before.score(Side::Black));
        assert_consistent(&pos);
        pos.undo();
        assert_eq!(pos.squares, before.squares);
        assert_eq!(pos.hash, before.hash);
        assert!(!pos.captured());
    }

    #[test]
    fn self_check_is_rejected_without_side_effects() {
        // The knight on e1 is all that keeps the two kings apart.
        let mut pos: Position = "4k4/9/9/9/9/9/9/9/4N4/4K4 w".parse().unwrap();
        let before = pos.clone();
        let off_file = Move::from_iccs("e1c2").unwrap();
        assert!(!pos.make(off_file));
        assert_eq!(pos.squares, before.squares);
        assert_eq!(pos.hash, before.hash);
        assert_eq!(pos.ply_count(), 0);
    }

    #[test]
    fn empty_cells_do_not_touch_the_hash() {
        let plain = BoardSnapshot::starting_position();
        let mut padded = plain;
        padded.cells[4][4] = Some(Piece::EMPTY);

        let a = Position::from_snapshot(&plain).unwrap();
        let b = Position::from_snapshot(&padded).unwrap();
        assert_eq!(a.hash, b.hash);
        assert_eq!(a.score, b.score);
        assert_eq!(hash_from_scratch(&b), b.hash);
        assert_consistent(&b);
    }

    #[test]
    fn side_not_to_move_may_not_be_in_check() {
        // Red to move with the black king already attacked along the e-file.
        let err = Position::from_snapshot(&"4k4/9/9/9/9/9/9/9/9/3KR4 w".parse().unwrap());
        assert_eq!(err.unwrap_err(), BoardError::OpponentInCheck { side: "black" });

        // Facing kings expose both sides.
        let err = Position::from_snapshot(&"4k4/9/9/9/9/9/9/9/9/4K4 b".parse().unwrap());
        assert_eq!(err.unwrap_err(), BoardError::OpponentInCheck { side: "red" });

        // Being in check on one's own turn is fine.
        let pos: Position = "4k4/9/9/9/9/9/9/9/9/3KR4 b".parse().unwrap();
        assert!(pos.in_check());
        assert!(pos.cached_check());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "undo past the history sentinel"))]
    fn undo_at_the_sentinel() {
        let mut pos = Position::starting_position();
        let before = pos.clone();
        pos.undo();
        assert_eq!(pos.squares, before.squares);
        assert_eq!(pos.ply_count(), 0);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "undo past the history sentinel"))]
    fn undo_null_at_the_sentinel() {
        let mut pos = Position::starting_position();
        pos.undo_null();
        assert_eq!(pos.side_to_move(), Side::Red);
        assert_eq!(pos.ply_count(), 0);
    }

    #[test]
    fn null_move_flips_side_only() {
        let mut pos = Position::starting_position();
        let before = pos.clone();
        pos.make_null();
        assert_eq!(pos.side_to_move(), Side::Black);
        assert_ne!(pos.key(), before.key());
        assert!(!pos.cached_check());
        assert_consistent(&pos);
        pos.undo_null();
        assert_eq!(pos.hash, before.hash);
        assert_eq!(pos.side_to_move(), Side::Red);
    }

    #[test]
    fn checking_move_sets_the_cached_flag() {
        let mut pos: Position = "4k4/9/9/9/9/9/9/9/R8/3K5 w".parse().unwrap();
        assert!(pos.make(Move::from_iccs("a1a9").unwrap()));
        assert!(pos.cached_check());
        assert!(pos.in_check());
    }

    #[test]
    fn play_rejects_bad_geometry() {
        let mut pos = Position::starting_position();
        let err = pos.play_iccs("h0h5").unwrap_err();
        assert!(matches!(err, MoveError::Illegal { .. }));
        assert!(matches!(
            pos.play_iccs("zz"),
            Err(MoveError::Unparseable { .. })
        ));
        assert_eq!(pos.play_iccs("h0g2"), Ok(Move::from_iccs("h0g2").unwrap()));
    }

    #[test]
    fn insufficient_material_ignores_pawns() {
        let bare: Position = "3k5/4P4/9/9/9/9/9/9/9/4K4 w".parse().unwrap();
        assert!(bare.insufficient_material());
        let with_rook: Position = "3k5/9/9/9/9/9/9/9/9/4K3R w".parse().unwrap();
        assert!(!with_rook.insufficient_material());
        assert!(!Position::starting_position().insufficient_material());
    }

    #[test]
    fn reset_history_keeps_the_board() {
        let mut pos = Position::starting_position();
        pos.play_iccs("h2e2").unwrap();
        let key = pos.key();
        pos.reset_history();
        assert_eq!(pos.ply_count(), 0);
        assert_eq!(pos.distance(), 0);
        assert_eq!(pos.key(), key);
        assert!(!pos.captured());
    }

    #[test]
    fn pretty_print_layout() {
        let pos = Position::starting_position();
        let text = pos.pretty().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "9  r n b a k a b n r");
        assert_eq!(lines[9], "0  R N B A K A B N R");
    }
}
