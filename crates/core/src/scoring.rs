//! Scoring module - star rating and milestone levels
//!
//! Stars use a coarse "optimal" bound of `colors * PIECES_PER_COLOR` moves rather
//! than a real shortest solution:
//!
//! | Stars | Moves | Time remaining |
//! |-------|-------|----------------|
//! | 3 | `<= optimal` | `> 1/2` of the limit |
//! | 2 | `<= optimal * 3/2` | `> 1/4` of the limit |
//! | 1 | anything else | |
//!
//! All comparisons are done in integers.

use crate::level::config_for;

/// Heuristic move target for `level`.
pub fn optimal_moves(level: u32) -> u32 {
    let config = config_for(level);
    (config.color_count * config.pieces_per_color) as u32
}

/// Star rating (1-3) for finishing `level` in `moves` with `time_remaining` seconds left.
pub fn stars(moves: u32, time_remaining: u32, level: u32) -> u8 {
    let optimal = u64::from(optimal_moves(level));
    let limit = u64::from(config_for(level).time_limit_secs);
    let moves = u64::from(moves);
    let remaining = u64::from(time_remaining);

    if moves <= optimal && remaining * 2 > limit {
        3
    } else if moves * 2 <= optimal * 3 && remaining * 4 > limit {
        2
    } else {
        1
    }
}

/// A finish within the heuristic move target.
pub fn is_perfect(moves: u32, level: u32) -> bool {
    moves <= optimal_moves(level)
}

/// A level finished in fewer seconds than this counts as a fast completion.
pub const FAST_COMPLETION_SECS: u32 = 30;

pub fn is_fast_completion(time_spent: u32) -> bool {
    time_spent < FAST_COMPLETION_SECS
}

/// Levels that unlock an achievement when completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    FirstLevel,
    Level10,
    Level50,
    Level100,
    Level500,
    Level1000,
}

impl Milestone {
    pub fn for_level(level: u32) -> Option<Self> {
        match level {
            1 => Some(Milestone::FirstLevel),
            10 => Some(Milestone::Level10),
            50 => Some(Milestone::Level50),
            100 => Some(Milestone::Level100),
            500 => Some(Milestone::Level500),
            1000 => Some(Milestone::Level1000),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Milestone::FirstLevel => "first_level",
            Milestone::Level10 => "level_10",
            Milestone::Level50 => "level_50",
            Milestone::Level100 => "level_100",
            Milestone::Level500 => "level_500",
            Milestone::Level1000 => "level_1000",
        }
    }
}
