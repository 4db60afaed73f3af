//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (rules, session engine, controller protocol).
//!
//! # Board Geometry
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TUBE_CAPACITY` | 6 | Maximum pieces a tube can hold |
//! | `PIECES_PER_COLOR` | 4 | Pieces of each color on a board |
//! | `EMPTY_TUBES` | 2 | Empty tubes added to every level |
//! | `MAX_COLORS` | 12 | Color cap for the expert band |
//!
//! # Session Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_LEVEL` | 1 | First level |
//! | `MAX_LEVEL` | 1000 | Last level |
//! | `MAX_HINTS` | 3 | Hints per level before rewards |
//! | `TICK_MS` | 1000 | Countdown tick interval |
//! | `WARNING_THRESHOLD_SECS` | 10 | Remaining time that triggers the warning cue |
//!
//! # Examples
//!
//! ```
//! use ball_sort_types::{Expression, Piece, SessionStatus, TUBE_CAPACITY};
//!
//! let a = Piece::new(2, Expression::Angry);
//! let b = Piece::new(2, Expression::Sleeping);
//!
//! // Game logic only compares colors.
//! assert!(a.same_color(&b));
//!
//! // Parse from string (case-insensitive)
//! assert_eq!(Expression::from_str("laughing"), Some(Expression::Laughing));
//! assert_eq!(SessionStatus::from_str("timeUp"), Some(SessionStatus::TimeUp));
//!
//! assert_eq!(TUBE_CAPACITY, 6);
//! ```

/// Maximum pieces a single tube can hold.
pub const TUBE_CAPACITY: usize = 6;

/// Number of pieces of each color dealt onto a board.
pub const PIECES_PER_COLOR: usize = 4;

/// Empty tubes added on top of the filled ones.
pub const EMPTY_TUBES: usize = 2;

/// Upper bound on colors in the expert band.
pub const MAX_COLORS: usize = 12;

/// First playable level.
pub const MIN_LEVEL: u32 = 1;

/// Last playable level.
pub const MAX_LEVEL: u32 = 1000;

/// Hints available per level before any reward hints are granted.
pub const MAX_HINTS: u32 = 3;

/// Countdown tick interval in milliseconds.
pub const TICK_MS: u64 = 1000;

/// Remaining seconds at or below which each tick plays the warning cue.
pub const WARNING_THRESHOLD_SECS: u32 = 10;


/// Cosmetic face drawn on a piece.
///
/// Expressions are derived from (level, color) and never influence the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expression {
    Angry,
    Laughing,
    Crying,
    Surprised,
    Sleeping,
}

impl Expression {
    /// All expressions in assignment order.
    pub const ALL: [Expression; 5] = [
        Expression::Angry,
        Expression::Laughing,
        Expression::Crying,
        Expression::Surprised,
        Expression::Sleeping,
    ];

    /// Number of distinct expressions.
    pub const COUNT: usize = Self::ALL.len();

    /// Expression at `index`, wrapping around the table.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    /// Parse expression from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use ball_sort_types::Expression;
    ///
    /// assert_eq!(Expression::from_str("Crying"), Some(Expression::Crying));
    /// assert_eq!(Expression::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "angry" => Some(Expression::Angry),
            "laughing" => Some(Expression::Laughing),
            "crying" => Some(Expression::Crying),
            "surprised" => Some(Expression::Surprised),
            "sleeping" => Some(Expression::Sleeping),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Expression::Angry => "angry",
            Expression::Laughing => "laughing",
            Expression::Crying => "crying",
            Expression::Surprised => "surprised",
            Expression::Sleeping => "sleeping",
        }
    }
}

/// A single ball.
///
/// Pieces are plain values moved between tubes. Two pieces belong together when
/// their `color_index` matches; `expression` is decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color_index: u8,
    pub expression: Expression,
}

impl Piece {
    pub fn new(color_index: u8, expression: Expression) -> Self {
        Self {
            color_index,
            expression,
        }
    }

    /// Rule-level equality.
    #[inline]
    pub fn same_color(&self, other: &Piece) -> bool {
        self.color_index == other.color_index
    }
}

/// Named difficulty band of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Normal,
    Hard,
    VeryHard,
    Expert,
}

impl Difficulty {
    /// Human readable band name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Very Easy",
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::VeryHard => "Very Hard",
            Difficulty::Expert => "Expert",
        }
    }
}

/// Difficulty descriptor for a level.
///
/// Built by `ball_sort_core::level::config_for`; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelConfig {
    pub level: u32,
    pub difficulty: Difficulty,
    pub color_count: usize,
    pub pieces_per_color: usize,
    /// Pieces a tube can hold (always `TUBE_CAPACITY`).
    pub capacity: usize,
    pub total_tubes: usize,
    pub filled_tubes: usize,
    pub empty_tubes: usize,
    pub time_limit_secs: u32,
}

impl LevelConfig {
    /// Total pieces on a board of this level.
    pub fn piece_count(&self) -> usize {
        self.color_count * self.pieces_per_color
    }
}

/// Lifecycle state of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Playing,
    Paused,
    Completed,
    TimeUp,
}

impl SessionStatus {
    /// Only a playing session accepts selections, undo and hints.
    pub fn accepts_moves(&self) -> bool {
        matches!(self, SessionStatus::Playing)
    }

    /// Completed and TimeUp end the level; only restart or a level change leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::TimeUp)
    }

    /// Parse status from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "playing" => Some(SessionStatus::Playing),
            "paused" => Some(SessionStatus::Paused),
            "completed" => Some(SessionStatus::Completed),
            "timeup" => Some(SessionStatus::TimeUp),
            _ => None,
        }
    }

    /// Convert to camelCase string for the controller protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Playing => "playing",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
            SessionStatus::TimeUp => "timeUp",
        }
    }
}

/// Audio/feedback cue requested by a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Select,
    Deselect,
    Error,
    Transfer,
    Victory,
    Warning,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Select => "select",
            Cue::Deselect => "deselect",
            Cue::Error => "error",
            Cue::Transfer => "transfer",
            Cue::Victory => "victory",
            Cue::Warning => "warning",
        }
    }
}

/// Why a move between two tubes was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveRejection {
    /// Source and destination are the same tube.
    SameTube,
    /// One of the indices does not name a tube.
    NoSuchTube,
    /// Nothing to move.
    SourceEmpty,
    /// Destination is at capacity.
    DestinationFull,
    /// Top colors differ.
    ColorMismatch,
}

impl MoveRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveRejection::SameTube => "same_tube",
            MoveRejection::NoSuchTube => "no_such_tube",
            MoveRejection::SourceEmpty => "source_empty",
            MoveRejection::DestinationFull => "destination_full",
            MoveRejection::ColorMismatch => "color_mismatch",
        }
    }
}

/// One applied move, kept for undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    pub from: usize,
    pub to: usize,
    pub count: usize,
}

/// A suggested legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hint {
    pub from: usize,
    pub to: usize,
}

/// Player or controller actions routed into a session.
///
/// These actions are used by both the controller protocol and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Tap a tube (select, deselect or move into it)
    Select { tube: usize },
    /// Revert the last move
    Undo,
    /// Ask for a legal move
    Hint,
    /// Stop the countdown
    Pause,
    /// Continue the countdown
    Resume,
    /// Regenerate the current level
    Restart,
    /// Advance after completing a level
    NextLevel,
    /// Jump to an unlocked level
    GoToLevel { level: u32 },
    /// Reward: extend the countdown
    AddTime { seconds: u32 },
}

impl GameAction {
    /// Convert to camelCase string for the controller protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Select { .. } => "select",
            GameAction::Undo => "undo",
            GameAction::Hint => "hint",
            GameAction::Pause => "pause",
            GameAction::Resume => "resume",
            GameAction::Restart => "restart",
            GameAction::NextLevel => "nextLevel",
            GameAction::GoToLevel { .. } => "goToLevel",
            GameAction::AddTime { .. } => "addTime",
        }
    }
}
