//! Headless Tetris engine with a line-based CPU opponent.
//!
//! The crate is split the way the game is layered: `core` holds the board
//! and piece primitives, `engine` the placement search the CPU uses,
//! `player` the spawn/fall/lock state machine, and `game` the match
//! controller with the mode rules. Everything is driven by
//! caller-supplied millisecond deltas, so a frontend (or a test) owns the
//! clock.

pub mod core;
pub mod engine;
pub mod game;
pub mod player;
pub mod types;

pub use crate::core::{Board, BoardError, Piece, SimpleRng};
pub use crate::engine::{find_destination, Destination, ScoreWeights};
pub use crate::game::{Match, MatchConfig};
pub use crate::player::{Controller, CpuController, HumanController, Player, PlayerEvent};
pub use crate::types::{Difficulty, GameMode, Intent, Outcome, PieceKind};
