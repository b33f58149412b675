//! Game module - the match controller that owns the players
//!
//! A match is one or two [`Player`]s plus the mode-specific win rules. Every
//! tick first applies the rules to the state left by the previous tick, then
//! advances each player by the same time slice, so the controller never sees
//! half-updated boards.

use arrayvec::ArrayVec;

use crate::core::BoardError;
use crate::engine::ScoreWeights;
use crate::player::{Player, PlayerEvent};
use crate::types::{
    Difficulty, GameMode, Intent, Outcome, HEALTH_PENALTY_PER_LINE, HEALTH_REWARD_PER_LINE,
    TIMED_MODE_MS,
};

/// Everything needed to start a match
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Base RNG seed; each player draws from its own derived stream
    pub seed: u32,
    pub weights: ScoreWeights,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,
            difficulty: Difficulty::Medium,
            seed: 1,
            weights: ScoreWeights::default(),
        }
    }
}

/// A running match: players, clock, and per-player outcomes
pub struct Match {
    mode: GameMode,
    players: ArrayVec<Player, 2>,
    outcomes: ArrayVec<Outcome, 2>,
    elapsed_ms: u32,
    finished: bool,
}

impl Match {
    /// Single human board, no opponent
    pub fn solo(config: &MatchConfig) -> Self {
        let mut players = ArrayVec::new();
        players.push(Player::human(config.seed));
        Self::with_players(config.mode, players)
    }

    /// Human on the left, CPU on the right
    pub fn human_vs_cpu(config: &MatchConfig) -> Self {
        let mut players = ArrayVec::new();
        players.push(Player::human(config.seed));
        players.push(Player::cpu(
            config.seed.wrapping_add(1),
            config.difficulty,
            config.weights,
        ));
        Self::with_players(config.mode, players)
    }

    /// Two CPU players, useful for demos and soak runs
    pub fn cpu_vs_cpu(config: &MatchConfig) -> Self {
        let mut players = ArrayVec::new();
        players.push(Player::cpu(config.seed, config.difficulty, config.weights));
        players.push(Player::cpu(
            config.seed.wrapping_add(1),
            config.difficulty,
            config.weights,
        ));
        Self::with_players(config.mode, players)
    }

    fn with_players(mode: GameMode, players: ArrayVec<Player, 2>) -> Self {
        let mut outcomes = ArrayVec::new();
        for _ in 0..players.len() {
            outcomes.push(Outcome::Ongoing);
        }
        Self {
            mode,
            players,
            outcomes,
            elapsed_ms: 0,
            finished: false,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Time left on the clock, for TIMED matches only
    pub fn remaining_ms(&self) -> Option<u32> {
        match self.mode {
            GameMode::Timed => Some(TIMED_MODE_MS.saturating_sub(self.elapsed_ms)),
            _ => None,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, index: usize) -> &Player {
        &self.players[index]
    }

    #[cfg(test)]
    pub fn player_mut(&mut self, index: usize) -> &mut Player {
        &mut self.players[index]
    }

    pub fn outcome(&self, index: usize) -> Outcome {
        self.outcomes[index]
    }

    /// Route an external movement intent to the human player, if there is one
    pub fn queue_intent(&mut self, intent: Intent) {
        for player in self.players.iter_mut() {
            if player.is_human() {
                player.queue_intent(intent);
                return;
            }
        }
    }

    /// Advance the match by one tick of `dt_ms` milliseconds
    pub fn update(&mut self, dt_ms: u32) -> Result<(), BoardError> {
        if self.finished {
            return Ok(());
        }

        self.apply_rules();
        if self.finished {
            return Ok(());
        }

        for player in self.players.iter_mut() {
            player.update(dt_ms)?;
        }

        if self.mode == GameMode::TugOfWar {
            self.settle_health();
        }

        self.elapsed_ms += dt_ms;
        Ok(())
    }

    /// Mode-specific win rules, evaluated against the previous tick's state
    fn apply_rules(&mut self) {
        match self.mode {
            GameMode::Normal => {
                if self.players.iter().any(Player::game_over) {
                    self.finish_by_crash();
                }
            }
            GameMode::Infinite => {
                // a crash only costs the player their stack
                for player in self.players.iter_mut() {
                    if player.game_over() {
                        player.reset();
                    }
                }
            }
            GameMode::Timed => {
                if self.players.iter().any(Player::game_over) {
                    self.finish_by_crash();
                } else if self.elapsed_ms >= TIMED_MODE_MS {
                    self.finish_by_lines();
                }
            }
            GameMode::TugOfWar => {
                if self
                    .players
                    .iter()
                    .any(|p| p.game_over() || p.health() == 0)
                {
                    for (player, outcome) in self.players.iter().zip(self.outcomes.iter_mut()) {
                        *outcome = if player.game_over() || player.health() == 0 {
                            Outcome::Lose
                        } else {
                            Outcome::Win
                        };
                    }
                    self.finished = true;
                }
            }
        }
    }

    /// Crashed players lose, everyone still standing wins. A solo crash is
    /// simply a loss.
    fn finish_by_crash(&mut self) {
        for (player, outcome) in self.players.iter().zip(self.outcomes.iter_mut()) {
            *outcome = if player.game_over() {
                Outcome::Lose
            } else {
                Outcome::Win
            };
        }
        self.finished = true;
    }

    /// Clock expired: the most completed lines wins, ties count as a win for
    /// both sides
    fn finish_by_lines(&mut self) {
        let best = self.players.iter().map(Player::lines).max().unwrap_or(0);
        for (player, outcome) in self.players.iter().zip(self.outcomes.iter_mut()) {
            *outcome = if player.lines() == best {
                Outcome::Win
            } else {
                Outcome::Lose
            };
        }
        self.finished = true;
    }

    /// Drain this tick's line-clear events and move health between the
    /// players: the clearer heals, the opponent takes a bigger hit
    fn settle_health(&mut self) {
        let mut deltas = [0i32; 2];
        for index in 0..self.players.len() {
            for event in self.players[index].take_events() {
                if let PlayerEvent::Cleared { lines } = event {
                    self.record_clear(&mut deltas, index, lines);
                }
            }
        }
        for (player, delta) in self.players.iter_mut().zip(deltas) {
            if delta != 0 {
                player.adjust_health(delta);
            }
        }
    }

    fn record_clear(&self, deltas: &mut [i32; 2], scorer: usize, lines: u32) {
        deltas[scorer] += HEALTH_REWARD_PER_LINE * lines as i32;
        for (index, delta) in deltas.iter_mut().enumerate() {
            if index != scorer && index < self.players.len() {
                *delta -= HEALTH_PENALTY_PER_LINE * lines as i32;
            }
        }
    }
}
