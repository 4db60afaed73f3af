//! Session engine - game lifecycle on top of the pure puzzle rules
//!
//! Owns everything with state or side effects: the selection state machine,
//! the countdown, undo history, hints, and the calls out to progress storage,
//! achievements and audio cues. Time is driven from outside through
//! [`Session::tick_epoch`], so the engine itself never sleeps or spawns.
//!
//! # Example
//!
//! ```
//! use ball_sort_engine::{Collaborators, Session, SessionEvent};
//! use ball_sort_engine::types::SessionStatus;
//!
//! let mut session = Session::start_seeded(Collaborators::default(), Vec::<SessionEvent>::new(), 7);
//! assert_eq!(session.level(), 1);
//! assert_eq!(session.status(), SessionStatus::Playing);
//!
//! let epoch = session.epoch();
//! session.tick_epoch(epoch);
//! assert_eq!(session.time_remaining(), 59);
//! ```

pub mod collaborators;
pub mod error;
pub mod events;
pub mod progress;
pub mod session;
pub mod timer;

pub use ball_sort_core::types;

pub use collaborators::{
    AchievementReporter, Collaborators, CueSink, LevelCompletionReport, NoopCues,
    NoopProgressStore, NoopReporter, PersistenceError, ProgressStore, ReportError,
};
pub use error::SessionError;
pub use events::{EventSink, SessionEvent, SessionSnapshot};
pub use progress::{LevelRecord, LevelResult, MemoryProgressStore, Progress, TotalStats};
pub use session::{SelectOutcome, Session};
pub use timer::{Countdown, TickOutcome};
