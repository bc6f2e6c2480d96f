use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::color::Color;

/// A falling piece: its kind, the anchor of its 4×4 bounding box, and the
/// current (possibly rotated) occupancy mask.
///
/// Pieces are plain values. Movement and rotation return new `ActivePiece`
/// instances; the controller validates a candidate against the board before
/// committing it, so a rejected move never needs to be undone.
///
/// # Coordinate System
///
/// - The anchor `(col, row)` is the top-left cell of the 4×4 box
/// - Columns increase rightward, rows increase downward
/// - Row 0 is the topmost hidden row of the board
/// - The anchor may be negative: only masked cells must lie on the board
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, PieceKind};
///
/// let piece = ActivePiece::new(PieceKind::T, 4, 0);
/// let moved = piece.shifted(-1, 1);
/// let rotated = moved.rotated_cw();
///
/// assert_eq!((rotated.col(), rotated.row()), (3, 1));
/// assert_eq!(rotated.mask(), PieceKind::T.base_mask().rotated_cw());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    kind: PieceKind,
    col: i32,
    row: i32,
    mask: PieceMask,
}

impl ActivePiece {
    /// Creates a piece of the given kind in its base orientation.
    #[must_use]
    pub const fn new(kind: PieceKind, col: i32, row: i32) -> Self {
        Self::with_mask(kind, col, row, kind.base_mask())
    }

    /// Creates a piece with an explicit occupancy mask.
    #[must_use]
    pub const fn with_mask(kind: PieceKind, col: i32, row: i32, mask: PieceMask) -> Self {
        Self {
            kind,
            col,
            row,
            mask,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub const fn mask(&self) -> PieceMask {
        self.mask
    }

    /// Display color, read from the shared catalog.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.kind.color()
    }

    /// Returns `true` if the board cell `(col, row)` is covered by this piece.
    ///
    /// Cells outside the 4×4 bounding box are never hit.
    #[must_use]
    pub fn is_hit(&self, col: i32, row: i32) -> bool {
        let (Ok(dx), Ok(dy)) = (
            usize::try_from(col - self.col),
            usize::try_from(row - self.row),
        ) else {
            return false;
        };
        self.mask.get_at(dx, dy)
    }

    /// Returns the board coordinates `(col, row)` of every masked cell.
    #[must_use]
    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn occupied_positions(&self) -> ArrayVec<(i32, i32), { PieceMask::CELLS }> {
        self.mask
            .cells()
            .map(|(dx, dy)| (self.col + dx as i32, self.row + dy as i32))
            .collect()
    }

    /// Returns this piece translated by `(dcol, drow)`.
    #[must_use]
    pub const fn shifted(&self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
            ..*self
        }
    }

    #[must_use]
    pub const fn rotated_cw(&self) -> Self {
        Self {
            mask: self.mask.rotated_cw(),
            ..*self
        }
    }

    #[must_use]
    pub const fn rotated_ccw(&self) -> Self {
        Self {
            mask: self.mask.rotated_ccw(),
            ..*self
        }
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// T-piece.
    T = 0,
    /// I-piece (straight).
    I = 1,
    /// L-piece.
    L = 2,
    /// J-piece (mirrored L).
    J = 3,
    /// O-piece (square).
    O = 4,
    /// S-piece.
    S = 5,
    /// Z-piece (mirrored S).
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every piece kind, in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::T,
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Occupancy of this piece in its spawn orientation.
    #[must_use]
    pub const fn base_mask(self) -> PieceMask {
        BASE_MASKS[self as usize]
    }

    /// Display color of this piece kind.
    #[must_use]
    pub const fn color(self) -> Color {
        PIECE_COLORS[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::T => 'T',
            PieceKind::I => 'I',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('J'), Some(PieceKind::J));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'T' => Some(PieceKind::T),
            'I' => Some(PieceKind::I),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Occupancy of a 4×4 bounding box, one bit per cell.
///
/// Bit `i` is the cell at local column `i % 4`, local row `i / 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceMask(u16);

/// Clockwise rotation: `rotated[i] = original[ROTATE_CW[i]]`.
pub const ROTATE_CW: [usize; PieceMask::CELLS] = [
    12, 8, 4, 0, //
    13, 9, 5, 1, //
    14, 10, 6, 2, //
    15, 11, 7, 3,
];

/// Counter-clockwise rotation: `rotated[i] = original[ROTATE_CCW[i]]`.
pub const ROTATE_CCW: [usize; PieceMask::CELLS] = [
    3, 7, 11, 15, //
    2, 6, 10, 14, //
    1, 5, 9, 13, //
    0, 4, 8, 12,
];

impl PieceMask {
    /// Width and height of the bounding box.
    pub const SIZE: usize = 4;
    /// Number of cells in the bounding box.
    pub const CELLS: usize = Self::SIZE * Self::SIZE;

    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Builds a mask from four rows of four cells, top row first.
    #[must_use]
    pub const fn from_rows(rows: [[bool; Self::SIZE]; Self::SIZE]) -> Self {
        let mut bits = 0;
        let mut y = 0;
        while y < Self::SIZE {
            let mut x = 0;
            while x < Self::SIZE {
                if rows[y][x] {
                    bits |= 1 << (x + y * Self::SIZE);
                }
                x += 1;
            }
            y += 1;
        }
        Self(bits)
    }

    /// Returns the cell at flat index `index` (`0..16`).
    #[must_use]
    pub const fn get(self, index: usize) -> bool {
        index < Self::CELLS && self.0 & (1 << index) != 0
    }

    /// Returns the cell at local column `dx`, local row `dy`.
    #[must_use]
    pub const fn get_at(self, dx: usize, dy: usize) -> bool {
        dx < Self::SIZE && dy < Self::SIZE && self.get(dx + dy * Self::SIZE)
    }

    /// Number of occupied cells.
    #[must_use]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn rotated_cw(self) -> Self {
        self.permuted(&ROTATE_CW)
    }

    #[must_use]
    pub const fn rotated_ccw(self) -> Self {
        self.permuted(&ROTATE_CCW)
    }

    const fn permuted(self, table: &[usize; Self::CELLS]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < Self::CELLS {
            if self.get(table[i]) {
                bits |= 1 << i;
            }
            i += 1;
        }
        Self(bits)
    }

    /// Iterates over the local `(dx, dy)` coordinates of occupied cells.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..Self::CELLS)
            .filter(move |&i| self.get(i))
            .map(|i| (i % Self::SIZE, i / Self::SIZE))
    }
}

const BASE_MASKS: [PieceMask; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // T-piece
        PieceMask::from_rows([EEEE, [C, C, C, E], [E, C, E, E], EEEE]),
        // I-piece
        PieceMask::from_rows([[E, C, E, E], [E, C, E, E], [E, C, E, E], [E, C, E, E]]),
        // L-piece
        PieceMask::from_rows([EEEE, [E, C, E, E], [E, C, E, E], [E, C, C, E]]),
        // J-piece
        PieceMask::from_rows([EEEE, [E, E, C, E], [E, E, C, E], [E, C, C, E]]),
        // O-piece
        PieceMask::from_rows([EEEE, [E, C, C, E], [E, C, C, E], EEEE]),
        // S-piece
        PieceMask::from_rows([EEEE, [E, C, C, E], [C, C, E, E], EEEE]),
        // Z-piece
        PieceMask::from_rows([EEEE, [C, C, E, E], [E, C, C, E], EEEE]),
    ]
};

const PIECE_COLORS: [Color; PieceKind::LEN] = [
    Color::PURPLE, // T
    Color::CYAN,   // I
    Color::ORANGE, // L
    Color::BLUE,   // J
    Color::YELLOW, // O
    Color::GREEN,  // S
    Color::RED,    // Z
];
