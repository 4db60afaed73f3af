//! Generated boards must be winnable.
//!
//! Shuffled deals are not checked at generation time, so these tests search
//! for a solution and replay it to confirm the board really completes.

use ball_sort::core::{generate_seeded, replay, solve};

const BUDGET: usize = 500_000;

fn assert_solvable(level: u32, seed: u64) {
    let board = generate_seeded(level, seed);
    let moves = solve(&board, BUDGET)
        .unwrap_or_else(|| panic!("level {level} seed {seed}: no solution within budget"));
    let finished = replay(&board, &moves).expect("solution replays");
    assert!(finished.is_complete(), "level {level} seed {seed}");
}

#[test]
fn very_easy_levels_are_solvable() {
    for level in [1, 2, 7, 13, 20] {
        for seed in 0..8 {
            assert_solvable(level, seed);
        }
    }
}

#[test]
fn easy_levels_are_solvable() {
    for level in [21, 30, 40] {
        for seed in 0..4 {
            assert_solvable(level, seed);
        }
    }
}

#[test]
fn normal_level_is_solvable() {
    for seed in 0..2 {
        assert_solvable(41, seed);
    }
}
