use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::COLS;

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// L-piece.
    L = 5,
    /// J-piece.
    J = 6,
}

/// Uniform selection among the 7 piece kinds.
///
/// Every draw is independent; there is no bag or history, so droughts and
/// repeats are possible by design.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::T,
            3 => PieceKind::S,
            4 => PieceKind::Z,
            5 => PieceKind::L,
            _ => PieceKind::J,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Returns the canonical spawn-orientation mask for this piece kind.
    #[must_use]
    pub fn spawn_shape(self) -> Shape {
        SPAWN_SHAPES[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            _ => None,
        }
    }
}

/// A piece mask: an R×C grid of filled/empty cells held in a fixed 4×4
/// backing buffer with explicit dimensions.
///
/// Shapes are value types. Rotation produces a new `Shape` with swapped
/// dimensions; the original is never mutated. Only the catalog and the
/// rotation transform can construct shapes, so every shape carries exactly
/// four filled cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; 4]; 4],
}

impl Shape {
    /// Height of the bounding box, in cells.
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.rows)
    }

    /// Width of the bounding box, in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.cols)
    }

    /// Whether the cell at `(row, col)` within the bounding box is filled.
    ///
    /// Coordinates outside the bounding box read as empty.
    #[must_use]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && self.cells[row][col]
    }

    /// Returns the filled cells of the mask as `(row, col)` offsets within
    /// the bounding box, in row-major order.
    #[must_use]
    pub fn filled_cells(&self) -> ArrayVec<(u8, u8), 4> {
        let mut filled = ArrayVec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.cells[usize::from(r)][usize::from(c)] {
                    filled.push((r, c));
                }
            }
        }
        filled
    }

    /// Returns a copy rotated 90° clockwise.
    ///
    /// For an R×C mask the result is C×R with
    /// `rotated[c][R-1-r] = mask[r][c]`. Applying this four times yields the
    /// original mask, and the intermediate states are exactly the reachable
    /// rotation states of the piece.
    #[must_use]
    pub fn rotated_cw(&self) -> Self {
        let mut cells = [[false; 4]; 4];
        for r in 0..self.height() {
            for c in 0..self.width() {
                cells[c][self.height() - 1 - r] = self.cells[r][c];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Returns a copy rotated 90° counter-clockwise.
    ///
    /// For an R×C mask the result is C×R with
    /// `rotated[C-1-c][r] = mask[r][c]`.
    #[must_use]
    pub fn rotated_ccw(&self) -> Self {
        let mut cells = [[false; 4]; 4];
        for r in 0..self.height() {
            for c in 0..self.width() {
                cells[self.width() - 1 - c][r] = self.cells[r][c];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

const SPAWN_SHAPES: [Shape; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    const fn s(rows: u8, cols: u8, cells: [[bool; 4]; 4]) -> Shape {
        Shape { rows, cols, cells }
    }

    [
        // I-piece
        s(1, 4, [[C, C, C, C], EEEE, EEEE, EEEE]),
        // O-piece
        s(2, 2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // T-piece
        s(2, 3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
        // S-piece
        s(2, 3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        s(2, 3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // L-piece
        s(2, 3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // J-piece
        s(2, 3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
    ]
};

/// An active (or queued) piece: a mask plus the grid position of its
/// bounding box's top-left corner.
///
/// Pieces are immutable; movement and rotation return candidate copies that
/// the caller validates against the board before committing. Coordinates are
/// signed so that candidates may leave the playfield and be rejected by the
/// collision check rather than by separate bounds logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    shape: Shape,
    row: i16,
    col: i16,
}

impl Piece {
    /// Creates a piece of the given kind at its canonical spawn position:
    /// the top row, horizontally centered (biased left on odd widths).
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = kind.spawn_shape();
        let col = (COLS / 2 - shape.width() / 2) as i16;
        Self {
            kind,
            shape,
            row: 0,
            col,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn row(&self) -> i16 {
        self.row
    }

    #[must_use]
    pub fn col(&self) -> i16 {
        self.col
    }

    /// Returns the absolute grid coordinates of the piece's filled cells.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<(i16, i16), 4> {
        self.shape
            .filled_cells()
            .iter()
            .map(|&(dr, dc)| (self.row + i16::from(dr), self.col + i16::from(dc)))
            .collect()
    }

    /// Returns a candidate translated by the given row/column deltas.
    #[must_use]
    pub fn translated(&self, d_row: i16, d_col: i16) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
            ..*self
        }
    }

    /// Returns a candidate rotated 90° clockwise in place (anchor unchanged).
    #[must_use]
    pub fn rotated_cw(&self) -> Self {
        Self {
            shape: self.shape.rotated_cw(),
            ..*self
        }
    }

    /// Returns a candidate rotated 90° counter-clockwise in place.
    #[must_use]
    pub fn rotated_ccw(&self) -> Self {
        Self {
            shape: self.shape.rotated_ccw(),
            ..*self
        }
    }
}
