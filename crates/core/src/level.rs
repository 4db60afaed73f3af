//! Level module - difficulty bands for levels 1..=1000
//!
//! | Levels | Difficulty | Colors | Tubes | Time limit |
//! |--------|------------|--------|-------|------------|
//! | 1-20 | Very Easy | 3 | 5 | 60s |
//! | 21-40 | Easy | 4 | 6 | 70s |
//! | 41-100 | Normal | 5 | 7 | 90s |
//! | 101-200 | Hard | 6 | 8 | 120s |
//! | 201-500 | Very Hard | 7 | 9 | 150s |
//! | 501-1000 | Expert | 8 + (level-500)/100, max 12 | colors + 2 | 180s + 30s per 50 levels |
//!
//! `config_for` clamps out-of-range levels into `MIN_LEVEL..=MAX_LEVEL`;
//! `try_config_for` rejects them instead.

use crate::error::LevelError;
use crate::types::{
    Difficulty, LevelConfig, EMPTY_TUBES, MAX_COLORS, MAX_LEVEL, MIN_LEVEL, PIECES_PER_COLOR,
    TUBE_CAPACITY,
};

/// Clamp a requested level into the playable range.
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Configuration for `level`, clamped into range.
pub fn config_for(level: u32) -> LevelConfig {
    let level = clamp_level(level);

    let (difficulty, color_count, time_limit_secs) = match level {
        1..=20 => (Difficulty::VeryEasy, 3, 60),
        21..=40 => (Difficulty::Easy, 4, 70),
        41..=100 => (Difficulty::Normal, 5, 90),
        101..=200 => (Difficulty::Hard, 6, 120),
        201..=500 => (Difficulty::VeryHard, 7, 150),
        _ => {
            let over = (level - 500) as usize;
            let colors = (8 + over / 100).min(MAX_COLORS);
            let time = 180 + (over as u32 / 50) * 30;
            (Difficulty::Expert, colors, time)
        }
    };

    LevelConfig {
        level,
        difficulty,
        color_count,
        pieces_per_color: PIECES_PER_COLOR,
        capacity: TUBE_CAPACITY,
        total_tubes: color_count + EMPTY_TUBES,
        filled_tubes: color_count,
        empty_tubes: EMPTY_TUBES,
        time_limit_secs,
    }
}

/// Configuration for `level`, or an error when it is outside `MIN_LEVEL..=MAX_LEVEL`.
pub fn try_config_for(level: u32) -> Result<LevelConfig, LevelError> {
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        return Err(LevelError::OutOfRange { level });
    }
    Ok(config_for(level))
}
