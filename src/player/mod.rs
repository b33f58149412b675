//! Player module - the per-board piece lifecycle state machine
//!
//! One player owns one board and at most two pieces (current + next). Each
//! tick advances the same spawn/fall/lock/line-clear machine for human and
//! CPU alike; the plugged-in [`Controller`] is the only difference between
//! the two.

pub mod controller;

use arrayvec::ArrayVec;

use crate::core::{Board, BoardError, Piece, SimpleRng};
use crate::engine::ScoreWeights;
use crate::types::{
    Difficulty, Intent, BASE_DROP_MS, LEVEL_SPEEDUP_PCT, LINES_PER_LEVEL, LINE_CLEAR_DISPLAY_MS,
    MAX_LEVEL, PREVIEW_COL, PREVIEW_ROW, START_COL, START_RANGE, START_ROW,
};

pub use controller::{Controller, CpuController, HumanController};

/// Discrete gameplay events a collaborator (renderer, audio layer) may react
/// to. Consumed via [`Player::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A piece became a permanent part of the board; `completed` rows are now
    /// awaiting their clear
    Locked { completed: u32 },
    /// Completed rows were cleared and gravity compaction applied
    Cleared { lines: u32 },
    /// The board crashed
    GameOver,
}

/// A single player: board, current/next piece, timers, and controller
pub struct Player {
    name: &'static str,
    board: Board,
    piece: Option<Piece>,
    next: Option<Piece>,
    controller: Box<dyn Controller>,
    rng: SimpleRng,
    human: bool,
    /// Fixed drop delay for the CPU (difficulty tier); humans follow the
    /// level curve instead
    base_drop_ms: u32,
    drop_timer_ms: u32,
    clear_timer_ms: u32,
    game_over: bool,
    /// Tug-of-war health pool, clamped to 0..=100
    health: i32,
    events: ArrayVec<PlayerEvent, 2>,
}

impl Player {
    /// Create a human player whose intents arrive through
    /// [`queue_intent`](Self::queue_intent)
    pub fn human(seed: u32) -> Self {
        Self::new("human", Box::new(HumanController::new()), seed, true, BASE_DROP_MS)
    }

    /// Create a CPU player at the given difficulty tier
    pub fn cpu(seed: u32, difficulty: Difficulty, weights: ScoreWeights) -> Self {
        Self::new(
            "cpu",
            Box::new(CpuController::new(weights)),
            seed,
            false,
            difficulty.drop_delay_ms(),
        )
    }

    fn new(
        name: &'static str,
        controller: Box<dyn Controller>,
        seed: u32,
        human: bool,
        base_drop_ms: u32,
    ) -> Self {
        Self {
            name,
            board: Board::new(),
            piece: None,
            next: None,
            controller,
            rng: SimpleRng::new(seed),
            human,
            base_drop_ms,
            drop_timer_ms: 0,
            clear_timer_ms: 0,
            game_over: false,
            health: crate::types::HEALTH_MAX,
            events: ArrayVec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_human(&self) -> bool {
        self.human
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The currently falling piece, if any
    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    /// The queued preview piece, anchored off the right edge of the board
    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    /// Total lines this player has completed
    pub fn lines(&self) -> u32 {
        self.board.lines()
    }

    /// Current level: one per 10 completed lines, capped so the game stays
    /// playable
    pub fn level(&self) -> u32 {
        (self.board.lines() / LINES_PER_LEVEL).min(MAX_LEVEL)
    }

    /// Current delay between gravity steps
    pub fn drop_delay_ms(&self) -> u32 {
        if self.human {
            BASE_DROP_MS - BASE_DROP_MS * LEVEL_SPEEDUP_PCT * self.level() / 100
        } else {
            self.base_drop_ms
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    /// Add to the health pool, clamped to 0..=100
    pub fn adjust_health(&mut self, change: i32) {
        self.health = (self.health + change).clamp(0, crate::types::HEALTH_MAX);
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Queue an external movement intent (ignored by CPU players)
    pub fn queue_intent(&mut self, intent: Intent) {
        self.controller.queue_intent(intent);
    }

    /// Drain the events raised since the last call
    pub fn take_events(&mut self) -> ArrayVec<PlayerEvent, 2> {
        std::mem::take(&mut self.events)
    }

    fn push_event(&mut self, event: PlayerEvent) {
        if !self.events.is_full() {
            self.events.push(event);
        }
    }

    /// Re-initialize the player for a fresh board (INFINITE mode crash reset
    /// and match restarts). Health and the RNG sequence carry over.
    pub fn reset(&mut self) {
        self.board.reset();
        self.piece = None;
        self.next = None;
        self.drop_timer_ms = 0;
        self.clear_timer_ms = 0;
        self.game_over = false;
        self.events.clear();
    }

    /// Advance the player by one tick of `dt_ms` milliseconds
    pub fn update(&mut self, dt_ms: u32) -> Result<(), BoardError> {
        if self.game_over {
            return Ok(());
        }

        // a completed row freezes gameplay until the display timer expires
        if self.board.has_complete() {
            self.clear_timer_ms += dt_ms;
            if self.clear_timer_ms >= LINE_CLEAR_DISPLAY_MS {
                let cleared = self.board.completed_row_count();
                self.board.set_lines(self.board.lines() + cleared);
                self.board.clear_completed_rows();
                self.board.drop_blocks();
                self.board.set_complete(false);
                self.clear_timer_ms = 0;
                self.push_event(PlayerEvent::Cleared { lines: cleared });
            }
            return Ok(());
        }

        let Some(mut piece) = self.piece.take() else {
            self.spawn_next();
            return Ok(());
        };

        match self.advance_piece(&mut piece, dt_ms) {
            Ok(true) => Ok(()), // locked; the piece is gone
            Ok(false) => {
                self.piece = Some(piece);
                Ok(())
            }
            Err(err) => {
                self.piece = Some(piece);
                Err(err)
            }
        }
    }

    /// Promote the queued piece to current and queue a fresh random one
    fn spawn_next(&mut self) {
        if let Some(mut next) = self.next.take() {
            next.set_col(START_COL);
            next.set_row(START_ROW);
            self.piece = Some(next);
            self.controller.on_piece_spawned();
        }
        self.next = Some(Piece::new(self.rng.next_kind(), PREVIEW_COL, PREVIEW_ROW));
    }

    /// One falling-piece tick: intent, then gravity. Returns true if the
    /// piece locked.
    fn advance_piece(&mut self, piece: &mut Piece, dt_ms: u32) -> Result<bool, BoardError> {
        if let Some(intent) = self.controller.decide(&mut self.board, piece)? {
            self.apply_intent(piece, intent);
        }

        self.drop_timer_ms += dt_ms;
        if self.drop_timer_ms < self.drop_delay_ms() {
            return Ok(false);
        }
        self.drop_timer_ms = 0;

        piece.increase_row();

        // while any block is still above the board the piece keeps entering
        if piece.is_above_ceiling() {
            return Ok(false);
        }

        if self.board.has_bounds(piece) && !self.board.collides(piece) {
            return Ok(false);
        }

        // undo the step and lock where the piece last fit
        piece.decrease_row();
        self.lock_piece(piece)?;
        Ok(true)
    }

    /// Apply one movement intent with the try-check-undo protocol
    fn apply_intent(&mut self, piece: &mut Piece, intent: Intent) {
        match intent {
            Intent::MoveLeft => {
                piece.decrease_col();
                if !self.board.has_bounds(piece) || self.board.collides(piece) {
                    piece.increase_col();
                }
            }
            Intent::MoveRight => {
                piece.increase_col();
                if !self.board.has_bounds(piece) || self.board.collides(piece) {
                    piece.decrease_col();
                }
            }
            Intent::Rotate => {
                piece.rotate_cw();
                if !piece.is_above_ceiling()
                    && (!self.board.has_bounds(piece) || self.board.collides(piece))
                {
                    piece.rotate_ccw();
                }
            }
            Intent::ForceDrop => {
                // expire the fall timer so gravity fires this tick
                self.drop_timer_ms = self.drop_delay_ms();
            }
        }
    }

    /// Commit a piece that can no longer fall
    fn lock_piece(&mut self, piece: &Piece) -> Result<(), BoardError> {
        if !self.board.has_bounds(piece) {
            // still out of bounds after backing up: the piece jammed at spawn
            self.board.fill_piece(piece);
            self.game_over = true;
        } else if self.board.collides(piece) {
            // crashed onto existing blocks; keep what fits
            self.board.fill_piece(piece);
            self.game_over = true;
        } else {
            self.board.add_piece(piece)?;
        }

        // buried spawn: any block in the start band at the top row ends the
        // game even when the lock itself succeeded
        for offset in 0..=START_RANGE {
            if self.board.has_block_at(START_COL - offset, START_ROW)
                || self.board.has_block_at(START_COL + offset, START_ROW)
            {
                self.game_over = true;
            }
        }

        let completed = if self.board.mark_completed_row() {
            self.board.completed_row_count()
        } else {
            0
        };
        self.push_event(PlayerEvent::Locked { completed });

        if self.game_over {
            self.push_event(PlayerEvent::GameOver);
        }

        Ok(())
    }

    /// Convenience used by tests and demo drivers: tick until the current
    /// piece (if any) resolves and a new one is in play or the game ends.
    #[cfg(test)]
    pub fn run_ticks(&mut self, ticks: u32, dt_ms: u32) -> Result<(), BoardError> {
        for _ in 0..ticks {
            self.update(dt_ms)?;
            if self.game_over {
                break;
            }
        }
        Ok(())
    }
}

/// Construct a piece of a known kind in the preview slot, bypassing the RNG.
#[cfg(test)]
impl Player {
    pub fn force_next(&mut self, kind: crate::types::PieceKind) {
        self.next = Some(Piece::new(kind, PREVIEW_COL, PREVIEW_ROW));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BlockCell;
    use crate::types::{PieceKind, BOARD_COLS, BOARD_ROWS};

    #[test]
    fn test_spawn_takes_two_ticks() {
        let mut player = Player::human(1);

        // first tick only queues the preview piece
        player.update(BASE_DROP_MS).unwrap();
        assert!(player.piece().is_none());
        assert!(player.next_piece().is_some());

        // second tick promotes it to current and queues a new preview
        player.update(BASE_DROP_MS).unwrap();
        let piece = player.piece().expect("current piece in play");
        assert_eq!(piece.col(), START_COL);
        assert_eq!(piece.row(), START_ROW);
        assert!(player.next_piece().is_some());
    }

    #[test]
    fn test_preview_piece_sits_off_board() {
        let mut player = Player::human(1);
        player.update(BASE_DROP_MS).unwrap();
        let next = player.next_piece().unwrap();
        assert!(next.col() >= BOARD_COLS);
    }

    #[test]
    fn test_piece_falls_and_locks_on_floor() {
        let mut player = Player::human(1);
        player.force_next(PieceKind::O);
        player.update(BASE_DROP_MS).unwrap(); // promote the O

        // O at the spawn needs 18 gravity steps to rest on the floor and one
        // more to lock
        player.run_ticks(19, BASE_DROP_MS).unwrap();

        assert!(player.piece().is_none());
        assert!(!player.game_over());
        // the O occupies the two bottom rows around the start column
        assert!(player.board().has_block_at(START_COL, BOARD_ROWS - 1));
        assert!(player.board().has_block_at(START_COL - 1, BOARD_ROWS - 1));

        let events = player.take_events();
        assert_eq!(events.as_slice(), &[PlayerEvent::Locked { completed: 0 }]);
    }

    #[test]
    fn test_force_drop_expires_the_timer() {
        let mut player = Player::human(1);
        player.force_next(PieceKind::O);
        player.update(BASE_DROP_MS).unwrap();
        let row_before = player.piece().unwrap().row();

        player.queue_intent(Intent::ForceDrop);
        // a tiny dt would normally not trigger gravity
        player.update(1).unwrap();
        assert_eq!(player.piece().unwrap().row(), row_before + 1);
    }

    #[test]
    fn test_move_reverts_at_the_wall() {
        let mut player = Player::human(1);
        player.force_next(PieceKind::O);
        player.update(1).unwrap();

        // the O spans cols START_COL-1..=START_COL; 5 moves reach the west
        // wall, further presses must be reverted
        for _ in 0..8 {
            player.queue_intent(Intent::MoveLeft);
            player.update(1).unwrap();
        }
        assert_eq!(player.piece().unwrap().col(), 1);
    }

    #[test]
    fn test_line_clear_freezes_then_resolves() {
        let mut player = Player::human(1);
        player.force_next(PieceKind::O);
        player.update(1).unwrap(); // promote the O

        // fill the bottom two rows except the two columns the O will land in
        let block = BlockCell {
            id: Piece::new(PieceKind::I, 0, 0).id(),
            kind: PieceKind::I,
        };
        for col in 0..BOARD_COLS {
            if col == START_COL || col == START_COL - 1 {
                continue;
            }
            player.board_mut().set(col, BOARD_ROWS - 1, Some(block));
            player.board_mut().set(col, BOARD_ROWS - 2, Some(block));
        }

        player.run_ticks(19, BASE_DROP_MS).unwrap();
        assert!(player.board().has_complete());
        assert_eq!(
            player.take_events().as_slice(),
            &[PlayerEvent::Locked { completed: 2 }]
        );

        // gameplay is frozen: no new piece spawns while the flag is set
        player.update(1).unwrap();
        assert!(player.piece().is_none());

        // expire the display timer
        player.update(LINE_CLEAR_DISPLAY_MS).unwrap();
        assert!(!player.board().has_complete());
        assert_eq!(player.lines(), 2);
        assert_eq!(
            player.take_events().as_slice(),
            &[PlayerEvent::Cleared { lines: 2 }]
        );

        // board is empty again after the clear plus compaction
        assert_eq!(player.board().aggregate_height(), 0);
    }

    #[test]
    fn test_buried_spawn_is_game_over() {
        let mut player = Player::human(1);
        player.force_next(PieceKind::O);
        player.update(1).unwrap();

        // a column of blocks right up to the spawn row
        let block = BlockCell {
            id: Piece::new(PieceKind::I, 0, 0).id(),
            kind: PieceKind::I,
        };
        for row in 1..BOARD_ROWS {
            player.board_mut().set(START_COL, row, Some(block));
        }

        // the piece cannot fall at all; the first gravity step locks it at
        // the top and the start-band scan flags the crash
        player.update(BASE_DROP_MS).unwrap();
        assert!(player.game_over());
        let events = player.take_events();
        assert!(events.contains(&PlayerEvent::GameOver));
    }

    #[test]
    fn test_health_clamps_to_bounds() {
        let mut player = Player::human(1);
        assert_eq!(player.health(), 100);

        player.adjust_health(50);
        assert_eq!(player.health(), 100);

        player.adjust_health(-250);
        assert_eq!(player.health(), 0);
    }

    #[test]
    fn test_human_level_curve_speeds_up_and_caps() {
        let mut player = Player::human(1);
        assert_eq!(player.drop_delay_ms(), BASE_DROP_MS);

        player.board_mut().set_lines(10);
        assert_eq!(player.level(), 1);
        assert!(player.drop_delay_ms() < BASE_DROP_MS);

        player.board_mut().set_lines(10_000);
        assert_eq!(player.level(), MAX_LEVEL);
        assert!(player.drop_delay_ms() >= BASE_DROP_MS / 5);
    }

    #[test]
    fn test_cpu_player_keeps_difficulty_delay() {
        let mut player = Player::cpu(1, Difficulty::VeryHard, ScoreWeights::default());
        player.board_mut().set_lines(100);
        assert_eq!(player.drop_delay_ms(), Difficulty::VeryHard.drop_delay_ms());
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut player = Player::human(1);
        player.update(BASE_DROP_MS).unwrap();
        player.update(BASE_DROP_MS).unwrap();
        player.board_mut().set_lines(3);

        player.reset();
        assert!(player.piece().is_none());
        assert!(player.next_piece().is_none());
        assert_eq!(player.lines(), 0);
        assert!(!player.game_over());
    }
}
