//! Piece module - tetromino geometry and rotation
//!
//! Each piece is 4 blocks defined as offsets relative to an anchor cell.
//! Rotation state is an integer 0..4; absolute offsets are derived fresh from
//! the base shape table on every query, so rotating clockwise and then
//! counter-clockwise is exact by construction (no accumulated drift).

use std::sync::atomic::{AtomicU32, Ordering};

use crate::types::PieceKind;

/// Offset of a single block relative to the piece anchor
pub type BlockOffset = (i8, i8);

/// Shape of a piece - 4 block offsets from the piece anchor
pub type PieceShape = [BlockOffset; 4];

/// Number of distinct rotation states
pub const TOTAL_ROTATIONS: u8 = 4;

/// Identity token shared by the 4 blocks of one piece.
///
/// Placed board cells carry this id so a simulated placement can be removed
/// again by matching ids, regardless of where the piece has moved since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(u32);

static NEXT_PIECE_ID: AtomicU32 = AtomicU32::new(1);

impl PieceId {
    fn next() -> Self {
        PieceId(NEXT_PIECE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Base (rotation 0) block offsets for each kind
fn base_shape(kind: PieceKind) -> PieceShape {
    match kind {
        // straight line
        PieceKind::I => [(-2, 0), (-1, 0), (0, 0), (1, 0)],
        PieceKind::J => [(0, 0), (0, 1), (1, 1), (2, 1)],
        PieceKind::L => [(0, 0), (0, 1), (-1, 1), (-2, 1)],
        // square
        PieceKind::O => [(-1, 0), (0, 0), (0, 1), (-1, 1)],
        PieceKind::S => [(0, 0), (1, 0), (0, 1), (-1, 1)],
        // half-plus
        PieceKind::T => [(0, 0), (0, 1), (1, 1), (-1, 1)],
        PieceKind::Z => [(0, 0), (-1, 0), (0, 1), (1, 1)],
    }
}

/// Rotate a single offset 90 degrees clockwise about the anchor
#[inline]
fn rotate_offset_cw((col, row): BlockOffset) -> BlockOffset {
    (row, -col)
}

/// A falling tetromino: kind, integer rotation state, and anchor position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    rotation: u8,
    col: i8,
    row: i8,
}

impl Piece {
    /// Create a new piece of the given kind anchored at (col, row)
    pub fn new(kind: PieceKind, col: i8, row: i8) -> Self {
        Self {
            id: PieceId::next(),
            kind,
            rotation: 0,
            col,
            row,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Current rotation state (0..4)
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn col(&self) -> i8 {
        self.col
    }

    pub fn row(&self) -> i8 {
        self.row
    }

    pub fn set_col(&mut self, col: i8) {
        self.col = col;
    }

    pub fn set_row(&mut self, row: i8) {
        self.row = row;
    }

    /// Move the anchor one column east
    pub fn increase_col(&mut self) {
        self.col += 1;
    }

    /// Move the anchor one column west
    pub fn decrease_col(&mut self) {
        self.col -= 1;
    }

    /// Move the anchor one row south
    pub fn increase_row(&mut self) {
        self.row += 1;
    }

    /// Move the anchor one row north
    pub fn decrease_row(&mut self) {
        self.row -= 1;
    }

    /// Rotate the piece 90 degrees clockwise
    pub fn rotate_cw(&mut self) {
        self.rotation = (self.rotation + 1) % TOTAL_ROTATIONS;
    }

    /// Rotate the piece 90 degrees counter-clockwise; exact inverse of
    /// [`rotate_cw`](Self::rotate_cw)
    pub fn rotate_ccw(&mut self) {
        self.rotation = (self.rotation + TOTAL_ROTATIONS - 1) % TOTAL_ROTATIONS;
    }

    /// Block offsets relative to the anchor for the current rotation
    pub fn shape(&self) -> PieceShape {
        let mut shape = base_shape(self.kind);
        for _ in 0..self.rotation {
            for offset in &mut shape {
                *offset = rotate_offset_cw(*offset);
            }
        }
        shape
    }

    /// Absolute board cells occupied by the piece
    pub fn cells(&self) -> [(i8, i8); 4] {
        let mut cells = self.shape();
        for (col, row) in &mut cells {
            *col += self.col;
            *row += self.row;
        }
        cells
    }

    /// True while any block sits above the top of the board.
    ///
    /// Collision and lock checks are skipped for such positions so a freshly
    /// spawned piece can enter the well.
    pub fn is_above_ceiling(&self) -> bool {
        self.cells().iter().any(|&(_, row)| row < 0)
    }
}
