//! Controllers - the two intent sources plugged into the player state machine
//!
//! Human and CPU share one state machine; only where the per-tick movement
//! intent comes from differs. The human controller replays queued key edges,
//! the CPU controller works toward a destination computed once per piece.

use std::collections::VecDeque;

use crate::core::{Board, BoardError, Piece};
use crate::engine::{find_destination, Destination, ScoreWeights};
use crate::types::Intent;

/// Produces at most one movement intent per tick while a piece is falling
pub trait Controller {
    /// Decide this tick's intent. The board and piece are borrowed mutably so
    /// an implementation may run a simulate-then-undo search; it must leave
    /// both exactly as it found them.
    fn decide(&mut self, board: &mut Board, piece: &mut Piece) -> Result<Option<Intent>, BoardError>;

    /// Called when a new piece enters play
    fn on_piece_spawned(&mut self) {}

    /// External input surface; only the human controller listens
    fn queue_intent(&mut self, _intent: Intent) {}
}

/// Keyboard-edge-driven controller: replays whatever the input layer queued
#[derive(Debug, Default)]
pub struct HumanController {
    queue: VecDeque<Intent>,
}

impl HumanController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Controller for HumanController {
    fn decide(
        &mut self,
        _board: &mut Board,
        _piece: &mut Piece,
    ) -> Result<Option<Intent>, BoardError> {
        Ok(self.queue.pop_front())
    }

    fn on_piece_spawned(&mut self) {
        // stale presses must not carry over to the next piece
        self.queue.clear();
    }

    fn queue_intent(&mut self, intent: Intent) {
        self.queue.push_back(intent);
    }
}

/// AI-search-driven controller: computes a destination once per piece and
/// steers toward it one step per tick
#[derive(Debug)]
pub struct CpuController {
    weights: ScoreWeights,
    target: Option<Destination>,
    resolved: bool,
}

impl CpuController {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            weights,
            target: None,
            resolved: false,
        }
    }

    #[cfg(test)]
    pub fn target(&self) -> Option<Destination> {
        self.target
    }
}

impl Controller for CpuController {
    fn decide(&mut self, board: &mut Board, piece: &mut Piece) -> Result<Option<Intent>, BoardError> {
        if !self.resolved {
            // the search runs once per piece; the result is cached until the
            // piece locks
            self.target = find_destination(board, piece, &self.weights)?;
            self.resolved = true;
            return Ok(None);
        }

        let Some(target) = self.target else {
            // no legal placement anywhere; let the piece fall where it is
            return Ok(Some(Intent::ForceDrop));
        };

        if piece.rotation() != target.rotation {
            Ok(Some(Intent::Rotate))
        } else if piece.col() < target.column {
            Ok(Some(Intent::MoveRight))
        } else if piece.col() > target.column {
            Ok(Some(Intent::MoveLeft))
        } else {
            // in place: expire the fall timer so the piece drops this tick
            Ok(Some(Intent::ForceDrop))
        }
    }

    fn on_piece_spawned(&mut self) {
        self.target = None;
        self.resolved = false;
    }
}
