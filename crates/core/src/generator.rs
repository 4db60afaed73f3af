//! Generator module - shuffled boards for a level
//!
//! Builds `colors x PIECES_PER_COLOR` pieces, shuffles them with Fisher-Yates
//! (`SliceRandom::shuffle`) and deals them into the filled tubes in order. The
//! trailing empty tubes stay empty.
//!
//! Seeded generation (`generate_seeded`) replays the same board for the same
//! `(level, seed)`, which tests and benchmarks rely on.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Tube};
use crate::expression::piece_for;
use crate::level::config_for;
use crate::types::Piece;

/// Generate a board for `level` using thread-local randomness.
pub fn generate(level: u32) -> Board {
    generate_with_rng(level, &mut rand::rng())
}

/// Generate a reproducible board for `level`.
pub fn generate_seeded(level: u32, seed: u64) -> Board {
    generate_with_rng(level, &mut StdRng::seed_from_u64(seed))
}

/// Generate a board for `level` from the given RNG.
///
/// Out-of-range levels are clamped like `config_for`.
pub fn generate_with_rng<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Board {
    let config = config_for(level);

    // color_count is at most MAX_COLORS, well inside u8.
    let mut pieces: Vec<Piece> = (0u8..)
        .take(config.color_count)
        .flat_map(|color| {
            let piece = piece_for(config.level, color);
            std::iter::repeat(piece).take(config.pieces_per_color)
        })
        .collect();
    pieces.shuffle(rng);

    let mut tubes: Vec<Tube> = pieces
        .chunks(config.pieces_per_color)
        .map(|chunk| {
            let mut tube = Tube::new();
            for piece in chunk {
                tube.push(*piece);
            }
            tube
        })
        .collect();
    tubes.resize_with(config.total_tubes, Tube::new);

    Board::from_parts(tubes, config.capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PIECES_PER_COLOR, TUBE_CAPACITY};

    #[test]
    fn test_level_one_shape() {
        let board = generate_seeded(1, 7);
        assert_eq!(board.tube_count(), 5);
        assert_eq!(board.capacity(), TUBE_CAPACITY);
        assert_eq!(board.piece_count(), 12);
        for i in 0..3 {
            assert_eq!(board.tube(i).unwrap().len(), 4);
        }
        assert!(board.tube(3).unwrap().is_empty());
        assert!(board.tube(4).unwrap().is_empty());
    }

    #[test]
    fn test_every_color_four_times() {
        for level in [1, 21, 41, 101, 201, 501, 700, 1000] {
            let board = generate_seeded(level, u64::from(level));
            let config = config_for(level);
            let histogram = board.color_histogram();
            assert_eq!(histogram.len(), config.color_count, "level {level}");
            assert!(histogram.iter().all(|&n| n == PIECES_PER_COLOR));
        }
    }

    #[test]
    fn test_seed_reproducible() {
        assert_eq!(generate_seeded(55, 1234), generate_seeded(55, 1234));
    }

    #[test]
    fn test_expressions_follow_level() {
        let board = generate_seeded(700, 3);
        for tube in board.tubes() {
            for piece in tube.pieces() {
                assert_eq!(
                    piece.expression,
                    crate::expression::expression_for(700, piece.color_index)
                );
            }
        }
    }

    #[test]
    fn test_out_of_range_clamped() {
        assert_eq!(generate_seeded(0, 9).tube_count(), 5);
        assert_eq!(generate_seeded(5000, 9).tube_count(), 14);
    }

    #[test]
    fn test_thread_rng_generate() {
        let board = generate(30);
        assert_eq!(board.piece_count(), 16);
        assert_eq!(board.tube_count(), 6);
    }
}
