//! Core module - pure simulation logic with no external dependencies
//!
//! Grid model, piece geometry/rotation, collision and line-clearing logic.
//! Nothing in here performs I/O or reads the clock; the caller drives
//! everything through synchronous queries and mutations.

pub mod board;
pub mod piece;
pub mod rng;

pub use board::{BlockCell, Board, BoardError, Cell};
pub use piece::{Piece, PieceId, PieceShape, TOTAL_ROTATIONS};
pub use rng::SimpleRng;
