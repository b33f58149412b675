//! Core types shared across the crate
//! This module contains pure data types with no external dependencies

/// Board dimensions
pub const BOARD_COLS: i8 = 10;
pub const BOARD_ROWS: i8 = 20;

/// Default place to start a piece
pub const START_COL: i8 = BOARD_COLS / 2;
pub const START_ROW: i8 = 0;

/// Columns around the start column scanned for the buried-spawn game over check
pub const START_RANGE: i8 = 2;

/// Where the next-piece preview sits (off the right edge of the board)
pub const PREVIEW_COL: i8 = BOARD_COLS + 2;
pub const PREVIEW_ROW: i8 = START_ROW + BOARD_ROWS - 3;

/// Game timing constants (in milliseconds)
pub const BASE_DROP_MS: u32 = 1000;
pub const LINE_CLEAR_DISPLAY_MS: u32 = 1000;
pub const TICK_MS: u32 = 16;

/// CPU drop delay per difficulty tier, very-easy..very-hard
pub const DIFFICULTY_DROP_MS: [u32; 5] = [1000, 800, 600, 400, 250];

/// Human speed curve: every 10 lines raises the level, each level shaves
/// LEVEL_SPEEDUP_PCT percent off the base drop delay, capped at MAX_LEVEL.
pub const LINES_PER_LEVEL: u32 = 10;
pub const LEVEL_SPEEDUP_PCT: u32 = 8;
pub const MAX_LEVEL: u32 = 10;

/// Timed mode match length (2 minutes)
pub const TIMED_MODE_MS: u32 = 120_000;

/// Tug-of-war health pool bounds and line clear reward/penalty
pub const HEALTH_MAX: i32 = 100;
pub const HEALTH_REWARD_PER_LINE: i32 = 1;
pub const HEALTH_PENALTY_PER_LINE: i32 = 3;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All seven kinds, in draw order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// Game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// First player to crash loses the match
    Normal,
    /// A crash resets that player; the match never ends on its own
    Infinite,
    /// Fixed duration; most completed lines wins, a crash loses immediately
    Timed,
    /// Health pools; line clears damage the opponent
    TugOfWar,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "normal",
            GameMode::Infinite => "infinite",
            GameMode::Timed => "timed",
            GameMode::TugOfWar => "tug-of-war",
        }
    }
}

/// Difficulty tiers for the CPU opponent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    /// Initial drop delay for a CPU player at this tier
    pub fn drop_delay_ms(&self) -> u32 {
        DIFFICULTY_DROP_MS[*self as usize]
    }
}

/// Movement intents fed to the player state machine while a piece is falling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Rotate,
    ForceDrop,
}

/// Terminal outcome for one player, as seen by the match controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Win,
    Lose,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_drop_delays_decrease() {
        let tiers = [
            Difficulty::VeryEasy,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::VeryHard,
        ];
        for pair in tiers.windows(2) {
            assert!(pair[0].drop_delay_ms() > pair[1].drop_delay_ms());
        }
    }

    #[test]
    fn test_piece_kind_all_is_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
