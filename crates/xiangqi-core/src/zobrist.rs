//! Zobrist keys and locks for position hashing.
//!
//! Each (piece, square) pair and the side to move carry two independent
//! 64-bit values: the `key` selects a transposition table slot and the
//! `lock` confirms the slot really belongs to the position.

use crate::piece::Piece;
use crate::position::Position;
use crate::side::Side;
use crate::square::Square;

const PIECE_SQUARES: usize = Piece::COUNT * 256;

/// Per (piece, square) keys, indexed by `[Piece::index()][Square::index()]`.
pub(crate) static PIECE_KEY: [[u64; 256]; Piece::COUNT] = piece_table(0);

/// Per (piece, square) locks, drawn after all keys.
pub(crate) static PIECE_LOCK: [[u64; 256]; Piece::COUNT] = piece_table(PIECE_SQUARES);

/// Key XORed whenever the side to move changes.
pub(crate) static SIDE_KEY: u64 = nth(2 * PIECE_SQUARES);

/// Lock XORed whenever the side to move changes.
pub(crate) static SIDE_LOCK: u64 = nth(2 * PIECE_SQUARES + 1);

const SEED: u64 = 0x5849_414e_4751_4921; // "XIANGQI!"

/// Xorshift64 PRNG. Returns (value, next_state).
const fn xorshift64(mut state: u64) -> (u64, u64) {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    (state, state)
}

/// Generator state after skipping `n` values.
const fn advance(n: usize) -> u64 {
    let mut state = SEED;
    let mut i = 0;
    while i < n {
        let (_, next) = xorshift64(state);
        state = next;
        i += 1;
    }
    state
}

const fn nth(n: usize) -> u64 {
    xorshift64(advance(n)).0
}

const fn piece_table(skip: usize) -> [[u64; 256]; Piece::COUNT] {
    let mut table = [[0u64; 256]; Piece::COUNT];
    let mut state = advance(skip);
    let mut piece = 0;
    while piece < Piece::COUNT {
        let mut sq = 0;
        while sq < 256 {
            let (val, next) = xorshift64(state);
            table[piece][sq] = val;
            state = next;
            sq += 1;
        }
        piece += 1;
    }
    table
}

/// The incremental key/lock pair of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZobristHash {
    pub key: u64,
    pub lock: u64,
}

impl ZobristHash {
    /// Toggle a piece on or off a square.
    #[inline]
    pub(crate) fn toggle_piece(&mut self, piece: Piece, sq: Square) {
        self.key ^= PIECE_KEY[piece.index()][sq.index()];
        self.lock ^= PIECE_LOCK[piece.index()][sq.index()];
    }

    /// Toggle the side to move.
    #[inline]
    pub(crate) fn toggle_side(&mut self) {
        self.key ^= SIDE_KEY;
        self.lock ^= SIDE_LOCK;
    }
}

/// Compute the key/lock pair from scratch for the given position.
pub fn hash_from_scratch(pos: &Position) -> ZobristHash {
    let mut hash = ZobristHash::default();
    for sq in Square::all() {
        let piece = pos.piece_at(sq);
        if !piece.is_empty() {
            hash.toggle_piece(piece, sq);
        }
    }
    if pos.side_to_move() == Side::Black {
        hash.toggle_side();
    }
    hash
}
