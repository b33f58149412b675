//! Placement simulator and scorer for the CPU opponent
//!
//! One-ply exhaustive search: every (rotation, column) placement of the
//! current piece is simulated by probing the landing row, committed to the
//! board, scored with a linear weighted model, and removed again. The board
//! and piece are returned to their original state before the search ends -
//! no candidate placement may ever be left applied.

use crate::core::{Board, BoardError, Piece, TOTAL_ROTATIONS};
use crate::types::{BOARD_COLS, BOARD_ROWS};

/// Weights for the linear board evaluation. Higher score wins.
///
/// The defaults are a publicly known heuristic weight set for this class of
/// Tetris AI; they are a tunable configuration, not an invariant, and tests
/// substitute deterministic sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Applied to the aggregate column height (negative: stay low)
    pub height: f64,
    /// Applied to the completed-row count (positive: clear lines)
    pub lines: f64,
    /// Applied to the hole count (negative: avoid covered gaps)
    pub holes: f64,
    /// Applied to the bumpiness (negative: keep the surface flat)
    pub bumpiness: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            height: -0.66569,
            lines: 0.99275,
            holes: -0.46544,
            bumpiness: -0.24077,
        }
    }
}

impl ScoreWeights {
    /// Evaluate a board state
    pub fn score(&self, board: &Board) -> f64 {
        self.height * board.aggregate_height() as f64
            + self.lines * board.completed_row_count() as f64
            + self.holes * board.hole_count() as f64
            + self.bumpiness * board.bumpiness() as f64
    }
}

/// The (rotation, column) pair chosen as the target landing placement.
///
/// Computed once per piece and reused every tick until the piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    /// Target rotation state (0..4)
    pub rotation: u8,
    /// Target anchor column
    pub column: i8,
}

/// Find the best-scoring placement for the piece on this board.
///
/// The search mutates the board and piece transiently and restores both
/// exactly before returning. Returns None only if no candidate placement is
/// legal at all (in practice the spawn columns always admit one).
pub fn find_destination(
    board: &mut Board,
    piece: &mut Piece,
    weights: &ScoreWeights,
) -> Result<Option<Destination>, BoardError> {
    let saved_col = piece.col();
    let saved_row = piece.row();
    let saved_rotation = piece.rotation();

    let result = search(board, piece, weights);

    // Restore the piece no matter how the search ended.
    piece.set_col(saved_col);
    piece.set_row(saved_row);
    while piece.rotation() != saved_rotation {
        piece.rotate_cw();
    }

    result
}

fn search(
    board: &mut Board,
    piece: &mut Piece,
    weights: &ScoreWeights,
) -> Result<Option<Destination>, BoardError> {
    let mut best: Option<Destination> = None;
    let mut best_score = 0.0;
    // the first legal candidate always registers, even with a negative score
    let mut initial = true;

    for _ in 0..TOTAL_ROTATIONS {
        // rotations are applied cumulatively; 4 of them return to the start
        piece.rotate_cw();

        for col in 0..BOARD_COLS {
            piece.set_col(col);
            piece.set_row(0);

            // reject the column outright if the spawn row is already illegal
            if !board.has_bounds(piece) || board.collides(piece) {
                continue;
            }

            // probe downward until the piece would leave the board or hit a
            // block, then back up exactly one row: that is the landing row
            for row in 0..=BOARD_ROWS {
                piece.set_row(row);

                if !board.has_bounds(piece) || board.collides(piece) {
                    piece.set_row(row - 1);

                    board.add_piece(piece)?;
                    let score = weights.score(board);
                    board.remove_piece(piece);

                    // strictly greater, so earlier rotations/columns win ties
                    if score > best_score || initial {
                        initial = false;
                        best_score = score;
                        best = Some(Destination {
                            rotation: piece.rotation(),
                            column: col,
                        });
                    }

                    break;
                }
            }
        }
    }

    Ok(best)
}
