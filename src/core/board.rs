//! Board module - the 10x20 grid where pieces are placed
//!
//! Uses a flat array for cache locality. Coordinates are (col, row) with
//! col in 0..10 (west to east) and row in 0..20 (top to bottom). Each occupied
//! cell remembers the id of the piece that placed it, which is what lets a
//! simulated placement be undone by [`Board::remove_piece`].

use std::fmt;

use arrayvec::ArrayVec;

use crate::core::piece::{Piece, PieceId};
use crate::types::{PieceKind, BOARD_COLS, BOARD_ROWS};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_COLS as usize) * (BOARD_ROWS as usize);

/// One placed block: the identity of the piece it came from plus its kind
/// (the kind doubles as the display color for renderers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCell {
    pub id: PieceId,
    pub kind: PieceKind,
}

/// Cell on the board (None = empty)
pub type Cell = Option<BlockCell>;

/// Contract violations raised by [`Board::add_piece`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// A block already exists where the piece would be placed
    Occupied,
    /// A block of the piece falls outside the board
    OutOfBounds,
}

impl BoardError {
    pub fn message(self) -> &'static str {
        match self {
            BoardError::Occupied => "a block already exists here and the piece can't be placed",
            BoardError::OutOfBounds => "a block of the piece is outside the board",
        }
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for BoardError {}

/// The game board for one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (row * COLS + col)
    cells: [Cell; BOARD_SIZE],
    /// Total number of lines completed on this board overall
    lines: u32,
    /// At least one row is currently complete and awaiting its clear
    complete: bool,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            lines: 0,
            complete: false,
        }
    }

    /// Calculate flat index from (col, row)
    #[inline(always)]
    fn index(col: i8, row: i8) -> Option<usize> {
        if col < 0 || col >= BOARD_COLS || row < 0 || row >= BOARD_ROWS {
            return None;
        }
        Some((row as usize) * (BOARD_COLS as usize) + (col as usize))
    }

    /// Total number of lines completed on this board overall
    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn set_lines(&mut self, lines: u32) {
        self.lines = lines;
    }

    /// Is at least one completed row awaiting its clear?
    pub fn has_complete(&self) -> bool {
        self.complete
    }

    pub fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
    }

    /// Get cell at (col, row); None if out of bounds
    pub fn get(&self, col: i8, row: i8) -> Option<Cell> {
        Self::index(col, row).map(|idx| self.cells[idx])
    }

    /// Set cell at (col, row); returns false if out of bounds
    pub fn set(&mut self, col: i8, row: i8, cell: Cell) -> bool {
        match Self::index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Does a block exist at the location? Out-of-bounds locations never
    /// contain a block.
    pub fn has_block_at(&self, col: i8, row: i8) -> bool {
        matches!(self.get(col, row), Some(Some(_)))
    }

    /// Is every block of the piece within the board bounds?
    /// Collision with placed blocks is not checked here.
    pub fn has_bounds(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .iter()
            .all(|&(col, row)| Self::index(col, row).is_some())
    }

    /// Does a placed block already occupy any cell of the piece?
    ///
    /// Cells outside the bounds never collide, so this predicate does not
    /// replace [`has_bounds`](Self::has_bounds).
    pub fn collides(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .iter()
            .any(|&(col, row)| self.has_block_at(col, row))
    }

    /// Add the piece to the board.
    ///
    /// Callers are expected to have validated the position with
    /// [`has_bounds`](Self::has_bounds) and [`collides`](Self::collides);
    /// a failure here is a contract violation, not a gameplay event.
    pub fn add_piece(&mut self, piece: &Piece) -> Result<(), BoardError> {
        if self.collides(piece) {
            return Err(BoardError::Occupied);
        }
        if !self.has_bounds(piece) {
            return Err(BoardError::OutOfBounds);
        }

        let block = BlockCell {
            id: piece.id(),
            kind: piece.kind(),
        };
        for (col, row) in piece.cells() {
            self.set(col, row, Some(block));
        }

        Ok(())
    }

    /// Remove every block on the board that shares the piece's id, regardless
    /// of where the piece has moved since. Idempotent.
    pub fn remove_piece(&mut self, piece: &Piece) {
        let id = piece.id();
        for cell in &mut self.cells {
            if matches!(cell, Some(block) if block.id == id) {
                *cell = None;
            }
        }
    }

    /// Best-effort placement used only at terminal game over: writes the
    /// piece's blocks into unoccupied in-bounds cells and silently drops the
    /// rest. Never fails.
    pub fn fill_piece(&mut self, piece: &Piece) {
        let block = BlockCell {
            id: piece.id(),
            kind: piece.kind(),
        };
        for (col, row) in piece.cells() {
            if !self.has_block_at(col, row) {
                self.set(col, row, Some(block));
            }
        }
    }

    /// Is the specified row entirely free of blocks?
    pub fn has_empty_row(&self, row: i8) -> bool {
        (0..BOARD_COLS).all(|col| !self.has_block_at(col, row))
    }

    /// Is every column of the specified row occupied?
    pub fn has_completed_row(&self, row: i8) -> bool {
        if row < 0 || row >= BOARD_ROWS {
            return false;
        }
        (0..BOARD_COLS).all(|col| self.has_block_at(col, row))
    }

    /// Number of rows that are currently complete
    pub fn completed_row_count(&self) -> u32 {
        (0..BOARD_ROWS)
            .filter(|&row| self.has_completed_row(row))
            .count() as u32
    }

    /// Row indices that are currently complete (top to bottom)
    pub fn completed_rows(&self) -> ArrayVec<i8, 4> {
        let mut rows = ArrayVec::new();
        for row in 0..BOARD_ROWS {
            if self.has_completed_row(row) && !rows.is_full() {
                rows.push(row);
            }
        }
        rows
    }

    /// Scan the board and raise the complete flag if at least one row is
    /// fully occupied. Returns true if a completed row was found.
    pub fn mark_completed_row(&mut self) -> bool {
        for row in 0..BOARD_ROWS {
            if self.has_completed_row(row) {
                self.set_complete(true);
                return true;
            }
        }
        false
    }

    /// Empty every completed row in place. Shifting the rows above down is a
    /// separate step, see [`drop_blocks`](Self::drop_blocks).
    pub fn clear_completed_rows(&mut self) {
        for row in 0..BOARD_ROWS {
            if self.has_completed_row(row) {
                self.clear_row(row);
            }
        }
    }

    fn clear_row(&mut self, row: i8) {
        for col in 0..BOARD_COLS {
            self.set(col, row, None);
        }
    }

    /// Move the blocks of every row that sits directly above an empty row
    /// down by one, repeating until no such pair exists.
    pub fn drop_blocks(&mut self) {
        let mut check = true;
        while check {
            check = false;
            for row in 0..BOARD_ROWS - 1 {
                if !self.has_empty_row(row) && self.has_empty_row(row + 1) {
                    self.drop_row(row);
                    check = true;
                }
            }
        }
    }

    /// Move all blocks in the specified row to the row below
    fn drop_row(&mut self, row: i8) {
        for col in 0..BOARD_COLS {
            if let Some(Some(block)) = self.get(col, row) {
                self.set(col, row + 1, Some(block));
                self.set(col, row, None);
            }
        }
    }

    /// Remove all blocks and reset counters to their initial state
    pub fn reset(&mut self) {
        self.set_complete(false);
        self.set_lines(0);
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Height of the highest block in the column (0 if the column is empty)
    pub fn column_height(&self, col: i8) -> u32 {
        for row in 0..BOARD_ROWS {
            if self.has_block_at(col, row) {
                return (BOARD_ROWS - row) as u32;
            }
        }
        0
    }

    /// Sum of the column heights across the board
    pub fn aggregate_height(&self) -> u32 {
        (0..BOARD_COLS).map(|col| self.column_height(col)).sum()
    }

    /// Number of empty cells with at least one block above them in the same
    /// column
    pub fn hole_count(&self) -> u32 {
        let mut count = 0;
        for col in 0..BOARD_COLS {
            let mut hit_block = false;
            for row in 0..BOARD_ROWS {
                if self.has_block_at(col, row) {
                    hit_block = true;
                } else if hit_block {
                    count += 1;
                }
            }
        }
        count
    }

    /// Sum of the absolute height differences between adjacent columns
    pub fn bumpiness(&self) -> u32 {
        (0..BOARD_COLS - 1)
            .map(|col| {
                let a = self.column_height(col);
                let b = self.column_height(col + 1);
                a.abs_diff(b)
            })
            .sum()
    }

    /// Get a reference to the internal cells array (row-major)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
