//! Core Xiangqi types: board representation, move generation, evaluation
//! terms and game rules.

mod check;
mod chess_move;
mod error;
mod eval;
mod movegen;
mod perft;
mod piece;
mod piece_kind;
mod position;
mod pst;
mod repetition;
mod side;
mod snapshot;
mod square;
mod zobrist;

pub use chess_move::Move;
pub use error::{BoardError, MoveError, SnapshotError};
pub use eval::{
    ADVANCED_VALUE, BAN_VALUE, DRAW_VALUE, MATE_VALUE, NULL_OKAY_MARGIN, NULL_SAFE_MARGIN,
    WIN_VALUE,
};
pub use movegen::{MAX_MOVES, MoveList, ScoredMove};
pub use perft::{divide, perft};
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use position::{Position, PrettyPosition};
pub use repetition::RepetitionStatus;
pub use side::Side;
pub use snapshot::{BoardSnapshot, STARTING_FEN};
pub use square::{COLS, FILE_LEFT, FILE_RIGHT, RANK_BOTTOM, RANK_TOP, ROWS, Square};
pub use zobrist::{ZobristHash, hash_from_scratch};
