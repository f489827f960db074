//! Squares on the padded 16x16 board.

use std::fmt;

use crate::side::Side;

/// Top (Black back) rank of the playable area.
pub const RANK_TOP: u8 = 3;
/// Bottom (Red back) rank of the playable area.
pub const RANK_BOTTOM: u8 = 12;
/// Leftmost playable file.
pub const FILE_LEFT: u8 = 3;
/// Rightmost playable file.
pub const FILE_RIGHT: u8 = 11;

/// Number of rows on the playable board.
pub const ROWS: usize = 10;
/// Number of columns on the playable board.
pub const COLS: usize = 9;

static IN_BOARD: [bool; 256] = {
    let mut table = [false; 256];
    let mut rank = RANK_TOP;
    while rank <= RANK_BOTTOM {
        let mut file = FILE_LEFT;
        while file <= FILE_RIGHT {
            table[(file + (rank << 4)) as usize] = true;
            file += 1;
        }
        rank += 1;
    }
    table
};

static IN_PALACE: [bool; 256] = {
    let mut table = [false; 256];
    let ranks = [
        RANK_TOP,
        RANK_TOP + 1,
        RANK_TOP + 2,
        RANK_BOTTOM - 2,
        RANK_BOTTOM - 1,
        RANK_BOTTOM,
    ];
    let mut i = 0;
    while i < ranks.len() {
        let mut file = FILE_LEFT + 3;
        while file <= FILE_LEFT + 5 {
            table[(file + (ranks[i] << 4)) as usize] = true;
            file += 1;
        }
        i += 1;
    }
    table
};

/// A square on the padded board, addressed as `file + rank * 16`.
///
/// The playable 9x10 area sits at files 3-11 and ranks 3-12, so every
/// piece offset used by move generation (at most two ranks and two files)
/// lands on a representable square. Squares outside that area never hold
/// a piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Square(u8);

impl Square {
    /// Create a square from its raw padded index.
    #[inline]
    pub const fn from_raw(raw: u8) -> Square {
        Square(raw)
    }

    /// Create a square from padded file and rank.
    #[inline]
    pub const fn from_file_rank(file: u8, rank: u8) -> Square {
        Square(file + (rank << 4))
    }

    /// Create a square from external board coordinates.
    ///
    /// Row 0 is Black's back rank and row 9 is Red's; column 0 is the left edge
    /// as Red sees it.
    pub const fn from_coords(row: usize, col: usize) -> Option<Square> {
        if row >= ROWS || col >= COLS {
            return None;
        }
        Some(Square::from_file_rank(FILE_LEFT + col as u8, RANK_TOP + row as u8))
    }

    /// External `(row, col)` coordinates. Only meaningful on the board.
    #[inline]
    pub const fn coords(self) -> (usize, usize) {
        (
            self.rank().saturating_sub(RANK_TOP) as usize,
            self.file().saturating_sub(FILE_LEFT) as usize,
        )
    }

    /// Parse an ICCS square such as `e0` (file letter, rank digit from Red's side).
    pub fn from_iccs(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = bytes[0].checked_sub(b'a')? as usize;
        let digit = bytes[1].checked_sub(b'0')? as usize;
        if digit >= ROWS {
            return None;
        }
        Square::from_coords(ROWS - 1 - digit, col)
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 & 15
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 >> 4
    }

    /// Whether the square is on the playable board.
    #[inline]
    pub fn on_board(self) -> bool {
        IN_BOARD[self.index()]
    }

    /// Whether the square is inside either palace.
    #[inline]
    pub fn in_palace(self) -> bool {
        IN_PALACE[self.index()]
    }

    /// Whether the square lies on `side`'s own half of the river.
    #[inline]
    pub const fn home_half(self, side: Side) -> bool {
        (self.0 & 0x80 != 0) == matches!(side, Side::Red)
    }

    /// Rotate the square 180 degrees about the board centre.
    #[inline]
    pub const fn flip(self) -> Square {
        Square(254 - self.0)
    }

    /// Step by a signed padded offset.
    #[inline]
    pub const fn offset(self, delta: i8) -> Square {
        Square(self.0.wrapping_add_signed(delta))
    }

    /// Iterate over every playable square, top-left first.
    pub fn all() -> impl Iterator<Item = Square> {
        (RANK_TOP..=RANK_BOTTOM)
            .flat_map(|rank| (FILE_LEFT..=FILE_RIGHT).map(move |file| Square::from_file_rank(file, rank)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.on_board() {
            return write!(f, "#{}", self.0);
        }
        let (row, col) = self.coords();
        write!(f, "{}{}", (b'a' + col as u8) as char, ROWS - 1 - row)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}
