//! Expression module - deterministic cosmetic faces
//!
//! Every color in a level gets the same face, derived from `(level, color)` with an
//! integer mix followed by one LCG step (Numerical Recipes constants).
//! The result is stable across runs and platforms.

use crate::types::{Expression, Piece};

const LEVEL_FACTOR: u64 = 37;
const COLOR_FACTOR: u64 = 23;
const MIX_FACTOR: u64 = 13;
const SEED_MODULUS: u64 = 999_983;

const LCG_A: u64 = 1_664_525;
const LCG_C: u64 = 1_013_904_223;

/// Integer seed for a (level, color) pair.
fn seed(level: u32, color_index: u8) -> u64 {
    let mixed = (u64::from(level) * LEVEL_FACTOR + u64::from(color_index) * COLOR_FACTOR)
        * MIX_FACTOR;
    mixed % SEED_MODULUS
}

/// Expression assigned to `color_index` on `level`.
///
/// Pure: the same inputs always give the same face.
pub fn expression_for(level: u32, color_index: u8) -> Expression {
    // One LCG step mod 2^32, then scale into [0, COUNT).
    let x = (LCG_A * seed(level, color_index) + LCG_C) & 0xFFFF_FFFF;
    let index = (x * Expression::COUNT as u64) >> 32;
    Expression::from_index(index as usize)
}

/// Expression for every color of a level, indexed by color.
pub fn level_expressions(level: u32, color_count: u8) -> Vec<Expression> {
    (0..color_count).map(|c| expression_for(level, c)).collect()
}

/// Build a piece with its derived expression.
pub fn piece_for(level: u32, color_index: u8) -> Piece {
    Piece::new(color_index, expression_for(level, color_index))
}
