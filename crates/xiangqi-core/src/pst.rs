//! Piece-square tables with material folded in.
//!
//! Written from Red's point of view on the 10x9 board (row 0 is Black's back
//! rank). Black pieces look up the rotated square.

use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::side::Side;
use crate::square::{COLS, FILE_LEFT, RANK_TOP, ROWS, Square};

type Grid = [[i16; COLS]; ROWS];

#[rustfmt::skip]
const KING: Grid = [
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  0,  0,  0, 0, 0, 0],
    [0, 0, 0,  1,  1,  1, 0, 0, 0],
    [0, 0, 0,  2,  2,  2, 0, 0, 0],
    [0, 0, 0, 11, 15, 11, 0, 0, 0],
];

// Advisors and bishops never share a square, so one table serves both.
#[rustfmt::skip]
const GUARD: Grid = [
    [ 0, 0,  0,  0,  0,  0,  0, 0,  0],
    [ 0, 0,  0,  0,  0,  0,  0, 0,  0],
    [ 0, 0,  0,  0,  0,  0,  0, 0,  0],
    [ 0, 0,  0,  0,  0,  0,  0, 0,  0],
    [ 0, 0,  0,  0,  0,  0,  0, 0,  0],
    [ 0, 0, 20,  0,  0,  0, 20, 0,  0],
    [ 0, 0,  0,  0,  0,  0,  0, 0,  0],
    [18, 0,  0, 20, 23, 20,  0, 0, 18],
    [ 0, 0,  0,  0, 23,  0,  0, 0,  0],
    [ 0, 0, 20, 20,  0, 20, 20, 0,  0],
];

#[rustfmt::skip]
const KNIGHT: Grid = [
    [90,  90,  90,  96,  90,  96,  90,  90, 90],
    [90,  96, 103,  97,  94,  97, 103,  96, 90],
    [92,  98,  99, 103,  99, 103,  99,  98, 92],
    [93, 108, 100, 107, 100, 107, 100, 108, 93],
    [90, 100,  99, 103, 104, 103,  99, 100, 90],
    [90,  98, 101, 102, 103, 102, 101,  98, 90],
    [92,  94,  98,  95,  98,  95,  98,  94, 92],
    [93,  92,  94,  95,  92,  95,  94,  92, 93],
    [85,  90,  92,  93,  78,  93,  92,  90, 85],
    [88,  85,  90,  88,  90,  88,  90,  85, 88],
];

#[rustfmt::skip]
const ROOK: Grid = [
    [206, 208, 207, 213, 214, 213, 207, 208, 206],
    [206, 212, 209, 216, 233, 216, 209, 212, 206],
    [206, 208, 207, 214, 216, 214, 207, 208, 206],
    [206, 213, 213, 216, 216, 216, 213, 213, 206],
    [208, 211, 211, 214, 215, 214, 211, 211, 208],
    [208, 212, 212, 214, 215, 214, 212, 212, 208],
    [204, 209, 204, 212, 214, 212, 204, 209, 204],
    [198, 208, 204, 212, 212, 212, 204, 208, 198],
    [200, 208, 206, 212, 200, 212, 206, 208, 200],
    [194, 206, 204, 212, 200, 212, 204, 206, 194],
];

#[rustfmt::skip]
const CANNON: Grid = [
    [100, 100,  96,  91,  90,  91,  96, 100, 100],
    [ 98,  98,  96,  92,  89,  92,  96,  98,  98],
    [ 97,  97,  96,  91,  92,  91,  96,  97,  97],
    [ 96,  99,  99,  98, 100,  98,  99,  99,  96],
    [ 96,  96,  96,  96, 100,  96,  96,  96,  96],
    [ 95,  96,  99,  96, 100,  96,  99,  96,  95],
    [ 96,  96,  96,  96,  96,  96,  96,  96,  96],
    [ 97,  96, 100,  99, 101,  99, 100,  96,  97],
    [ 96,  97,  98,  98,  98,  98,  98,  97,  96],
    [ 96,  96,  97,  99,  99,  99,  97,  96,  96],
];

#[rustfmt::skip]
const PAWN: Grid = [
    [ 9,  9,  9, 11, 13, 11,  9,  9,  9],
    [19, 24, 34, 42, 44, 42, 34, 24, 19],
    [19, 24, 32, 37, 37, 37, 32, 24, 19],
    [19, 23, 27, 29, 30, 29, 27, 23, 19],
    [14, 18, 20, 27, 29, 27, 20, 18, 14],
    [ 7,  0, 13,  0, 16,  0, 13,  0,  7],
    [ 7,  0,  7,  0, 15,  0,  7,  0,  7],
    [ 0,  0,  0,  0,  0,  0,  0,  0,  0],
    [ 0,  0,  0,  0,  0,  0,  0,  0,  0],
    [ 0,  0,  0,  0,  0,  0,  0,  0,  0],
];

/// Expand a 10x9 grid onto the padded board.
const fn expand(grid: &Grid) -> [i32; 256] {
    let mut table = [0i32; 256];
    let mut row = 0;
    while row < ROWS {
        let mut col = 0;
        while col < COLS {
            let sq = (FILE_LEFT as usize + col) + ((RANK_TOP as usize + row) << 4);
            table[sq] = grid[row][col] as i32;
            col += 1;
        }
        row += 1;
    }
    table
}

/// Tables indexed by `[PieceKind::index()][Square::index()]`, Red's view.
static TABLES: [[i32; 256]; PieceKind::COUNT] = [
    expand(&KING),
    expand(&GUARD),
    expand(&GUARD),
    expand(&KNIGHT),
    expand(&ROOK),
    expand(&CANNON),
    expand(&PAWN),
];

/// Score contribution of `piece` standing on `sq`, for its own side.
#[inline]
pub(crate) fn value(piece: Piece, sq: Square) -> i32 {
    let table = &TABLES[piece.kind().index()];
    match piece.side() {
        Some(Side::Red) => table[sq.index()],
        Some(Side::Black) => table[sq.flip().index()],
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_reads_the_rotated_square() {
        let red = Piece::new(PieceKind::Knight, Side::Red);
        let black = Piece::new(PieceKind::Knight, Side::Black);
        for sq in Square::all() {
            assert_eq!(value(red, sq), value(black, sq.flip()));
        }
    }

    #[test]
    fn tables_are_left_right_symmetric() {
        for table in &TABLES {
            for sq in Square::all() {
                let (row, col) = sq.coords();
                let mirror = Square::from_coords(row, COLS - 1 - col).unwrap();
                assert_eq!(table[sq.index()], table[mirror.index()]);
            }
        }
    }

    #[test]
    fn off_board_squares_score_nothing() {
        for table in &TABLES {
            for raw in 0..=255u8 {
                let sq = Square::from_raw(raw);
                if !sq.on_board() {
                    assert_eq!(table[sq.index()], 0);
                }
            }
        }
    }

    #[test]
    fn rook_outweighs_cannon_and_knight() {
        let centre = Square::from_coords(5, 4).unwrap();
        let rook = value(Piece::new(PieceKind::Rook, Side::Red), centre);
        let cannon = value(Piece::new(PieceKind::Cannon, Side::Red), centre);
        let knight = value(Piece::new(PieceKind::Knight, Side::Red), centre);
        assert!(rook > cannon && rook > knight);
    }
}
