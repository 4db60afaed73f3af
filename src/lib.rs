//! Ball sort (workspace facade crate).
//!
//! Re-exports the workspace crates under one name: puzzle rules in `core`,
//! the session lifecycle in `engine`, and the TCP controller plus file-backed
//! collaborators in `adapter`. [`ticker`] schedules a session's countdown for
//! the runner.

pub mod ticker;

pub use ball_sort_adapter as adapter;
pub use ball_sort_core as core;
pub use ball_sort_engine as engine;
pub use ball_sort_types as types;

pub use ticker::Ticker;
