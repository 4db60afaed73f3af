//! Outside services the session calls into
//!
//! The session owns one [`Collaborators`] bundle. Calls are synchronous and
//! their failures are logged by the session and otherwise ignored: a broken store
//! or reporter never blocks play.

use ball_sort_core::types::Cue;

use crate::progress::{LevelResult, Progress};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("progress store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("progress data is malformed: {0}")]
    Malformed(String),

    #[error("progress store lock poisoned")]
    Poisoned,

    #[error("progress store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("achievement service unavailable: {0}")]
    Unavailable(String),
}

/// Persists level results and restores progress at session start.
pub trait ProgressStore: Send {
    fn save_level_result(&mut self, result: &LevelResult) -> Result<(), PersistenceError>;
    fn load_progress(&self) -> Result<Progress, PersistenceError>;
    fn reset(&mut self) -> Result<(), PersistenceError>;
}

/// Data handed to the achievement/leaderboard service on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCompletionReport {
    pub level: u32,
    pub moves: u32,
    pub time_remaining: u32,
    /// Seconds ticked on the level before it was finished.
    pub time_spent: u32,
    pub hints_used: u32,
    pub is_perfect: bool,
}

impl LevelCompletionReport {
    pub fn is_fast(&self) -> bool {
        ball_sort_core::is_fast_completion(self.time_spent)
    }

    pub fn used_no_hints(&self) -> bool {
        self.hints_used == 0
    }
}

pub trait AchievementReporter: Send {
    fn report_level_completion(&mut self, report: &LevelCompletionReport)
        -> Result<(), ReportError>;
}

/// Audio or haptic feedback. Playback results are not observed.
pub trait CueSink: Send {
    fn play_cue(&mut self, cue: Cue);
}

/// Store that remembers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressStore;

impl ProgressStore for NoopProgressStore {
    fn save_level_result(&mut self, _result: &LevelResult) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn load_progress(&self) -> Result<Progress, PersistenceError> {
        Ok(Progress::default())
    }

    fn reset(&mut self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl AchievementReporter for NoopReporter {
    fn report_level_completion(
        &mut self,
        _report: &LevelCompletionReport,
    ) -> Result<(), ReportError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCues;

impl CueSink for NoopCues {
    fn play_cue(&mut self, _cue: Cue) {}
}

/// Everything a session talks to besides its event sink.
pub struct Collaborators {
    pub progress: Box<dyn ProgressStore>,
    pub reporter: Box<dyn AchievementReporter>,
    pub cues: Box<dyn CueSink>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            progress: Box::new(NoopProgressStore),
            reporter: Box::new(NoopReporter),
            cues: Box::new(NoopCues),
        }
    }
}

impl Collaborators {
    pub fn with_progress(mut self, progress: impl ProgressStore + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn with_reporter(mut self, reporter: impl AchievementReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn with_cues(mut self, cues: impl CueSink + 'static) -> Self {
        self.cues = Box::new(cues);
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
