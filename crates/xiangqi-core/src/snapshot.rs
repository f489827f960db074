//! External board snapshot: a 10x9 grid plus the side to move, with
//! Xiangqi FEN parsing and serialization.

use std::fmt;
use std::str::FromStr;

use crate::error::{BoardError, SnapshotError, side_name};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::side::Side;
use crate::square::{COLS, ROWS, Square};

/// The FEN string for the standard opening position.
pub const STARTING_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

/// Board state as exchanged with callers.
///
/// Row 0 is Black's back rank, row 9 Red's. Column 0 is file `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub cells: [[Option<Piece>; COLS]; ROWS],
    pub side_to_move: Side,
}

impl BoardSnapshot {
    /// No pieces, Red to move.
    pub const fn empty() -> BoardSnapshot {
        BoardSnapshot {
            cells: [[None; COLS]; ROWS],
            side_to_move: Side::Red,
        }
    }

    /// The standard opening layout.
    pub fn starting_position() -> BoardSnapshot {
        const BACK: [PieceKind; COLS] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Advisor,
            PieceKind::King,
            PieceKind::Advisor,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut snapshot = BoardSnapshot::empty();
        for (side, back, cannon, pawn) in [(Side::Black, 0, 2, 3), (Side::Red, 9, 7, 6)] {
            for (col, kind) in BACK.into_iter().enumerate() {
                snapshot.cells[back][col] = Some(Piece::new(kind, side));
            }
            for col in [1, 7] {
                snapshot.cells[cannon][col] = Some(Piece::new(PieceKind::Cannon, side));
            }
            for col in (0..COLS).step_by(2) {
                snapshot.cells[pawn][col] = Some(Piece::new(PieceKind::Pawn, side));
            }
        }
        snapshot
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        self.cells.get(row)?.get(col).copied().flatten()
    }

    /// Place or clear a cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, row: usize, col: usize, piece: Option<Piece>) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = piece.filter(|p| !p.is_empty());
        }
    }

    /// Check the structural rules a position must satisfy before loading.
    ///
    /// Each side needs exactly one king inside its own palace and no more
    /// pieces of a kind than a full set holds. Piece placement is otherwise
    /// unrestricted.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut counts = [[0usize; PieceKind::COUNT]; Side::COUNT];
        for row in 0..ROWS {
            for col in 0..COLS {
                let Some(piece) = self.cells[row][col] else {
                    continue;
                };
                let Some(side) = piece.side() else {
                    continue;
                };
                counts[side.index()][piece.kind().index()] += 1;
                if piece.kind() == PieceKind::King {
                    let inside = Square::from_coords(row, col)
                        .is_some_and(|sq| sq.in_palace() && sq.home_half(side));
                    if !inside {
                        return Err(BoardError::KingOutsidePalace {
                            side: side_name(side),
                        });
                    }
                }
            }
        }

        for side in Side::ALL {
            let kings = counts[side.index()][PieceKind::King.index()];
            if kings != 1 {
                return Err(BoardError::InvalidKingCount {
                    side: side_name(side),
                    count: kings,
                });
            }
            for kind in PieceKind::ALL {
                let count = counts[side.index()][kind.index()];
                if count > kind.max_count() {
                    return Err(BoardError::TooManyPieces {
                        side: side_name(side),
                        kind: kind.fen_char(),
                        count,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        BoardSnapshot::starting_position()
    }
}

impl FromStr for BoardSnapshot {
    type Err = SnapshotError;

    /// Parse the placement and side fields of a Xiangqi FEN.
    ///
    /// The side field may be `w`, `r` or `b` and defaults to Red when
    /// absent. Any further fields (clocks, move numbers) are ignored.
    fn from_str(fen: &str) -> Result<BoardSnapshot, SnapshotError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(SnapshotError::Empty)?;

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != ROWS {
            return Err(SnapshotError::WrongRowCount { found: rows.len() });
        }

        let mut snapshot = BoardSnapshot::empty();
        for (row, text) in rows.iter().enumerate() {
            let mut col = 0usize;
            for c in text.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if !(1..=9).contains(&digit) {
                        return Err(SnapshotError::InvalidPieceChar { character: c });
                    }
                    col += digit as usize;
                } else {
                    let piece = Piece::from_fen_char(c)
                        .ok_or(SnapshotError::InvalidPieceChar { character: c })?;
                    if col >= COLS {
                        return Err(SnapshotError::BadRowLength {
                            row,
                            length: col + 1,
                        });
                    }
                    snapshot.cells[row][col] = Some(piece);
                    col += 1;
                }
            }
            if col != COLS {
                return Err(SnapshotError::BadRowLength { row, length: col });
            }
        }

        snapshot.side_to_move = match fields.next() {
            None | Some("w" | "r") => Side::Red,
            Some("b") => Side::Black,
            Some(other) => {
                return Err(SnapshotError::InvalidSide {
                    found: other.to_string(),
                });
            }
        };
        Ok(snapshot)
    }
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            if row > 0 {
                f.write_str("/")?;
            }
            let mut gap = 0;
            for cell in cells {
                match cell {
                    Some(piece) => {
                        if gap > 0 {
                            write!(f, "{gap}")?;
                            gap = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                write!(f, "{gap}")?;
            }
        }
        write!(f, " {}", self.side_to_move)
    }
}
