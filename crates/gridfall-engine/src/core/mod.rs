pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of rows in the playfield.
pub const ROWS: usize = 20;
/// Number of columns in the playfield.
pub const COLS: usize = 10;
