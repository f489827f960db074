//! Error types for snapshot parsing, board validation and move replay.

use crate::side::Side;

/// Errors from structural validation of a board snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// A side does not have exactly one king.
    #[error("expected 1 king for {side}, found {count}")]
    InvalidKingCount {
        /// Which side has the wrong king count.
        side: &'static str,
        /// Number of kings found.
        count: usize,
    },
    /// A king stands outside its own palace.
    #[error("{side} king is outside its palace")]
    KingOutsidePalace {
        /// Which side's king is misplaced.
        side: &'static str,
    },
    /// A side owns more pieces of one kind than a full set contains.
    #[error("{side} has {count} pieces of kind '{kind}'")]
    TooManyPieces {
        side: &'static str,
        kind: char,
        count: usize,
    },
    /// The side that is not to move is in check, so its king could be taken.
    #[error("{side} is in check but it is not {side}'s turn")]
    OpponentInCheck { side: &'static str },
}

/// Errors that occur when parsing a Xiangqi FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// The string has no piece placement field.
    #[error("empty FEN string")]
    Empty,
    /// The piece placement section does not have exactly 10 rows.
    #[error("expected 10 rows in piece placement, found {found}")]
    WrongRowCount { found: usize },
    /// A row describes more or fewer than 9 points.
    #[error("row {row} describes {length} points, expected 9")]
    BadRowLength { row: usize, length: usize },
    /// An unrecognized character appeared in the piece placement.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },
    /// The side field is not `w`, `r` or `b`.
    #[error("invalid side to move: \"{found}\"")]
    InvalidSide { found: String },
    /// The parsed board fails structural validation.
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
}

/// Errors from replaying a move onto a position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The text is not an ICCS move such as `h2e2`.
    #[error("unparseable move: \"{text}\"")]
    Unparseable { text: String },
    /// The move does not follow the piece's movement rules.
    #[error("illegal move {mv} for {side}")]
    Illegal { mv: String, side: &'static str },
    /// The move would leave the mover's king in check.
    #[error("move {mv} leaves the {side} king in check")]
    SelfCheck { mv: String, side: &'static str },
}

/// Human-readable side name for error messages.
pub(crate) const fn side_name(side: Side) -> &'static str {
    match side {
        Side::Red => "red",
        Side::Black => "black",
    }
}
