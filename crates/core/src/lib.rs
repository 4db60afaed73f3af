//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the ball sort puzzle: level configuration,
//! board generation, move validation, completion detection and scoring.
//! It has **no dependencies** on timers, networking, or I/O, making it:
//!
//! - **Deterministic**: seeded generation reproduces the same board
//! - **Testable**: every rule is a plain function or method on [`Board`]
//! - **Portable**: runs headless, in tests, or behind any front end
//!
//! # Module Structure
//!
//! - [`expression`]: cosmetic faces derived from `(level, color)`
//! - [`level`]: difficulty bands for levels 1-1000
//! - [`generator`]: shuffled boards for a level
//! - [`board`]: tubes, move validation, transfers, undo and completion
//! - [`scoring`]: star rating, perfect finishes and milestone levels
//! - [`solver`]: bounded search used to check generated boards are winnable
//!
//! # Game Rules
//!
//! - A move pours the top run of one color from a source tube into a destination
//!   tube, limited by the destination's free space.
//! - The destination must be empty or have the same color on top.
//! - A level is complete when every tube is empty or holds a single color stack.
//!
//! # Example
//!
//! ```
//! use ball_sort_core::{config_for, generate_seeded};
//!
//! let board = generate_seeded(1, 42);
//! let config = config_for(1);
//! assert_eq!(board.tube_count(), config.total_tubes);
//! assert_eq!(board.piece_count(), config.piece_count());
//!
//! if let Some(hint) = board.first_valid_move() {
//!     let mut next = board.clone();
//!     let record = next.apply_move(hint.from, hint.to).unwrap();
//!     assert!(record.count >= 1);
//! }
//! ```

pub mod board;
pub mod error;
pub mod expression;
pub mod generator;
pub mod level;
pub mod scoring;
pub mod solver;

pub use ball_sort_types as types;

// Re-export commonly used items for convenience
pub use board::{Board, BoardError, Tube};
pub use error::LevelError;
pub use expression::{expression_for, level_expressions, piece_for};
pub use generator::{generate, generate_seeded, generate_with_rng};
pub use level::{clamp_level, config_for, try_config_for};
pub use scoring::{
    is_fast_completion, is_perfect, optimal_moves, stars, Milestone, FAST_COMPLETION_SECS,
};
pub use solver::{replay, solve};
