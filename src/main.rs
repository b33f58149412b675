//! Headless match runner (default binary).
//!
//! Pits two CPU players against each other at a fixed tick rate and prints
//! the result. Handy as a smoke test for the engine and as a seed explorer:
//! pass a seed as the first argument to replay a specific match.

use anyhow::{Context, Result};

use tetris_duel::{Difficulty, GameMode, Match, MatchConfig};
use tetris_duel::types::TICK_MS;

/// Upper bound so a stalemate cannot spin forever (one simulated hour)
const MAX_TICKS: u32 = 3_600_000 / TICK_MS;

fn main() -> Result<()> {
    let seed = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u32>()
            .with_context(|| format!("invalid seed: {arg}"))?,
        None => 1,
    };

    let config = MatchConfig {
        mode: GameMode::Normal,
        difficulty: Difficulty::Hard,
        seed,
        ..MatchConfig::default()
    };

    let mut game = Match::cpu_vs_cpu(&config);
    let mut ticks = 0;
    while !game.finished() && ticks < MAX_TICKS {
        game.update(TICK_MS)?;
        ticks += 1;
    }

    println!(
        "seed {seed}: {} simulated ms, mode {}",
        game.elapsed_ms(),
        game.mode().as_str()
    );
    for index in 0..game.player_count() {
        let player = game.player(index);
        println!(
            "  player {index} ({}): {} lines, level {}, {:?}",
            player.name(),
            player.lines(),
            player.level(),
            game.outcome(index)
        );
    }

    Ok(())
}
