//! Session module - one player's run through the levels
//!
//! The session owns the board, the countdown, and all per-level counters. Every
//! player action goes through it; nothing else mutates a board in play.
//!
//! # States
//!
//! | From | Trigger | To |
//! |------|---------|----|
//! | Playing | board complete after a move | Completed |
//! | Playing | countdown reaches zero | TimeUp |
//! | Playing | `pause` | Paused |
//! | Paused | `resume` | Playing |
//! | any | `restart` | Playing (same level, new board) |
//! | Completed | `next_level` | Playing (level + 1) |
//! | any | `go_to_level` (unlocked) | Playing |
//!
//! # Events
//!
//! Each mutation ends with `StateChanged`. Moves add `MoveCompleted` or
//! `MoveRejected` before it, completion adds `LevelCompleted`. Ticks emit only
//! `TimeUpdated`, plus `StateChanged` when time runs out.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use ball_sort_core::types::{
    Cue, GameAction, Hint, MoveRecord, MoveRejection, SessionStatus, MAX_HINTS, MAX_LEVEL,
    MIN_LEVEL, WARNING_THRESHOLD_SECS,
};
use ball_sort_core::{clamp_level, config_for, generate_with_rng, is_perfect, stars, Board};

use crate::collaborators::{Collaborators, LevelCompletionReport};
use crate::error::SessionError;
use crate::events::{EventSink, SessionEvent, SessionSnapshot};
use crate::progress::LevelResult;
use crate::timer::{Countdown, TickOutcome};

/// What a tube tap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Session is not playing.
    Ignored,
    Selected(usize),
    Deselected,
    Moved(MoveRecord),
    Rejected(MoveRejection),
}

pub struct Session<S: EventSink = Vec<SessionEvent>> {
    board: Board,
    level: u32,
    max_level_reached: u32,
    moves: u32,
    selected: Option<usize>,
    history: Vec<MoveRecord>,
    hints_used: u32,
    /// Reward hints, spent once the per-level allowance is used up.
    bonus_hints: u32,
    countdown: Countdown,
    /// Seconds ticked on the current level.
    elapsed_secs: u32,
    status: SessionStatus,
    rng: StdRng,
    collaborators: Collaborators,
    sink: S,
}

impl<S: EventSink> Session<S> {
    /// Start a session at the saved level, with fresh randomness.
    pub fn start(collaborators: Collaborators, sink: S) -> Self {
        let rng = StdRng::from_rng(&mut rand::rng());
        Self::start_with_rng(collaborators, sink, rng)
    }

    /// Start a session whose boards are reproducible from `seed`.
    pub fn start_seeded(collaborators: Collaborators, sink: S, seed: u64) -> Self {
        Self::start_with_rng(collaborators, sink, StdRng::seed_from_u64(seed))
    }

    fn start_with_rng(collaborators: Collaborators, sink: S, rng: StdRng) -> Self {
        let (level, max_level_reached) = match collaborators.progress.load_progress() {
            Ok(progress) => {
                let level = clamp_level(progress.current_level);
                (level, clamp_level(progress.max_level_reached.max(level)))
            }
            Err(err) => {
                warn!(error = %err, "failed to load progress, starting at level 1");
                (MIN_LEVEL, MIN_LEVEL)
            }
        };

        let config = config_for(level);
        let mut session = Self {
            board: Board::default(),
            level,
            max_level_reached,
            moves: 0,
            selected: None,
            history: Vec::new(),
            hints_used: 0,
            bonus_hints: 0,
            countdown: Countdown::new(config.time_limit_secs),
            elapsed_secs: 0,
            status: SessionStatus::Playing,
            rng,
            collaborators,
            sink,
        };
        info!(level, max_level_reached, "session started");
        session.load_level(level);
        session
    }

    // Accessors

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level_reached(&self) -> u32 {
        self.max_level_reached
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn hints_remaining(&self) -> u32 {
        MAX_HINTS.saturating_sub(self.hints_used) + self.bonus_hints
    }

    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn time_limit(&self) -> u32 {
        self.countdown.limit()
    }

    /// Epoch the ticker must pass to `tick_epoch`.
    pub fn epoch(&self) -> u64 {
        self.countdown.epoch()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            level: self.level,
            max_level_reached: self.max_level_reached,
            status: self.status,
            moves: self.moves,
            selected: self.selected,
            hints_used: self.hints_used,
            hints_remaining: self.hints_remaining(),
            time_remaining: self.countdown.remaining(),
            time_limit: self.countdown.limit(),
            epoch: self.countdown.epoch(),
            capacity: self.board.capacity(),
            tubes: self
                .board
                .tubes()
                .iter()
                .map(|t| t.pieces().to_vec())
                .collect(),
            can_undo: self.can_undo(),
        }
    }

    // Player actions

    /// Tap a tube: select it, deselect it, or pour the selection into it.
    pub fn select_tube(&mut self, tube: usize) -> SelectOutcome {
        if !self.status.accepts_moves() {
            return SelectOutcome::Ignored;
        }

        let Some(from) = self.selected else {
            return match self.board.tube(tube).map(|t| t.is_empty()) {
                None => {
                    self.cue(Cue::Error);
                    SelectOutcome::Rejected(MoveRejection::NoSuchTube)
                }
                Some(true) => {
                    self.cue(Cue::Error);
                    SelectOutcome::Rejected(MoveRejection::SourceEmpty)
                }
                Some(false) => {
                    self.selected = Some(tube);
                    self.cue(Cue::Select);
                    self.emit_state();
                    SelectOutcome::Selected(tube)
                }
            };
        };

        if from == tube {
            self.selected = None;
            self.cue(Cue::Deselect);
            self.emit_state();
            return SelectOutcome::Deselected;
        }

        match self.board.apply_move(from, tube) {
            Ok(record) => {
                self.history.push(record);
                self.moves += 1;
                self.selected = None;
                self.cue(Cue::Transfer);
                self.sink.emit(SessionEvent::MoveCompleted {
                    from: record.from,
                    to: record.to,
                    moved: record.count,
                });
                if self.board.is_complete() {
                    self.complete_level();
                }
                self.emit_state();
                SelectOutcome::Moved(record)
            }
            Err(reason) => {
                debug!(from, to = tube, reason = reason.as_str(), "move rejected");
                self.cue(Cue::Error);
                self.sink.emit(SessionEvent::MoveRejected {
                    from,
                    to: tube,
                    reason,
                });
                SelectOutcome::Rejected(reason)
            }
        }
    }

    /// Revert the last move. False when there is nothing to undo or the level is not in play.
    pub fn undo(&mut self) -> bool {
        if !self.status.accepts_moves() {
            return false;
        }
        let Some(record) = self.history.pop() else {
            return false;
        };
        if !self.board.undo_move(record) {
            // History and board disagree; keep the record so nothing is lost.
            self.history.push(record);
            warn!(?record, "undo record does not match board");
            return false;
        }
        self.moves = self.moves.saturating_sub(1);
        self.selected = None;
        self.cue(Cue::Deselect);
        self.emit_state();
        true
    }

    /// First legal move in scan order, spending one hint.
    ///
    /// Returns `None` without spending when hints are exhausted or no move exists.
    pub fn hint(&mut self) -> Option<Hint> {
        if !self.status.accepts_moves() || self.hints_remaining() == 0 {
            return None;
        }
        let hint = self.board.first_valid_move()?;
        if self.hints_used >= MAX_HINTS {
            self.bonus_hints -= 1;
        }
        self.hints_used += 1;
        self.emit_state();
        Some(hint)
    }

    /// Add reward hints.
    pub fn grant_hints(&mut self, count: u32) {
        self.bonus_hints = self.bonus_hints.saturating_add(count);
        self.emit_state();
    }

    pub fn pause(&mut self) -> bool {
        if self.status != SessionStatus::Playing {
            return false;
        }
        self.status = SessionStatus::Paused;
        self.countdown.stop();
        self.emit_state();
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        self.status = SessionStatus::Playing;
        self.countdown.resume();
        self.emit_state();
        true
    }

    /// New board for the current level; counters and countdown reset.
    pub fn restart(&mut self) {
        self.cue(Cue::Deselect);
        self.load_level(self.level);
    }

    pub fn next_level(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Completed {
            return Err(SessionError::NotCompleted {
                status: self.status,
            });
        }
        let next = self.level.saturating_add(1).min(MAX_LEVEL);
        self.load_level(next);
        Ok(())
    }

    /// Jump to any level up to `max_level_reached`.
    pub fn go_to_level(&mut self, level: u32) -> Result<(), SessionError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(SessionError::LevelOutOfRange { level });
        }
        if level > self.max_level_reached {
            return Err(SessionError::LevelLocked {
                level,
                max_level_reached: self.max_level_reached,
            });
        }
        self.load_level(level);
        Ok(())
    }

    /// Reward: extend the countdown. Refused once the level is over.
    pub fn add_extra_time(&mut self, secs: u32) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.countdown.extend(secs);
        self.emit_time();
        self.emit_state();
        true
    }

    /// Wipe saved progress and go back to level 1.
    pub fn reset_progress(&mut self) {
        if let Err(err) = self.collaborators.progress.reset() {
            warn!(error = %err, "failed to reset saved progress");
        }
        self.max_level_reached = MIN_LEVEL;
        self.bonus_hints = 0;
        info!("progress reset");
        self.load_level(MIN_LEVEL);
    }

    /// Swap in a hand-built board for the current level and restart its countdown.
    #[cfg(test)]
    pub(crate) fn replace_board(&mut self, board: Board) {
        self.reset_level_state(self.level);
        self.board = board;
        self.emit_state();
    }

    /// Route a controller action. Hints are returned; refusals become errors.
    pub fn apply_action(&mut self, action: GameAction) -> Result<Option<Hint>, SessionError> {
        let status = self.status;
        match action {
            GameAction::Select { tube } => match self.select_tube(tube) {
                SelectOutcome::Ignored => Err(SessionError::NotPlaying { status }),
                SelectOutcome::Rejected(reason) => Err(SessionError::MoveRejected(reason)),
                _ => Ok(None),
            },
            GameAction::Undo => {
                if !status.accepts_moves() {
                    Err(SessionError::NotPlaying { status })
                } else if self.undo() {
                    Ok(None)
                } else {
                    Err(SessionError::NothingToUndo)
                }
            }
            GameAction::Hint => {
                if !status.accepts_moves() {
                    return Err(SessionError::NotPlaying { status });
                }
                if self.hints_remaining() == 0 {
                    return Err(SessionError::HintsExhausted);
                }
                self.hint().map(Some).ok_or(SessionError::NoMoveAvailable)
            }
            GameAction::Pause => {
                if self.pause() {
                    Ok(None)
                } else {
                    Err(SessionError::NotPlaying { status })
                }
            }
            GameAction::Resume => {
                if self.resume() {
                    Ok(None)
                } else {
                    Err(SessionError::NotPaused { status })
                }
            }
            GameAction::Restart => {
                self.restart();
                Ok(None)
            }
            GameAction::NextLevel => self.next_level().map(|_| None),
            GameAction::GoToLevel { level } => self.go_to_level(level).map(|_| None),
            GameAction::AddTime { seconds } => {
                if self.add_extra_time(seconds) {
                    Ok(None)
                } else {
                    Err(SessionError::LevelFinished { status })
                }
            }
        }
    }

    // Countdown

    /// Deliver one tick for the current epoch.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_epoch(self.countdown.epoch())
    }

    /// Deliver one tick scheduled under `epoch`. Ticks from an older epoch are ignored.
    pub fn tick_epoch(&mut self, epoch: u64) -> TickOutcome {
        let outcome = self.countdown.tick(epoch);
        match outcome {
            TickOutcome::Running { remaining } => {
                self.elapsed_secs += 1;
                self.emit_time();
                if remaining <= WARNING_THRESHOLD_SECS {
                    self.cue(Cue::Warning);
                }
            }
            TickOutcome::Expired => {
                self.elapsed_secs += 1;
                self.emit_time();
                self.status = SessionStatus::TimeUp;
                self.selected = None;
                self.cue(Cue::Warning);
                self.cue(Cue::Error);
                info!(level = self.level, moves = self.moves, "time up");
                self.emit_state();
            }
            TickOutcome::Stale => {
                debug!(epoch, current = self.countdown.epoch(), "stale tick ignored");
            }
            TickOutcome::Stopped => {}
        }
        outcome
    }

    // Internals

    fn reset_level_state(&mut self, level: u32) {
        let config = config_for(level);
        self.level = config.level;
        self.moves = 0;
        self.selected = None;
        self.history.clear();
        self.hints_used = 0;
        self.elapsed_secs = 0;
        self.countdown.restart(config.time_limit_secs);
        self.status = SessionStatus::Playing;
    }

    fn load_level(&mut self, level: u32) {
        self.reset_level_state(level);
        self.board = generate_with_rng(self.level, &mut self.rng);
        debug!(
            level = self.level,
            tubes = self.board.tube_count(),
            time_limit = self.countdown.limit(),
            epoch = self.countdown.epoch(),
            "level loaded"
        );
        self.emit_state();
    }

    fn complete_level(&mut self) {
        self.status = SessionStatus::Completed;
        self.countdown.stop();
        let next = self.level.saturating_add(1).min(MAX_LEVEL);
        self.max_level_reached = self.max_level_reached.max(next);

        let time_remaining = self.countdown.remaining();
        let stars = stars(self.moves, time_remaining, self.level);
        let result = LevelResult {
            level: self.level,
            moves: self.moves,
            time_remaining,
            time_spent: self.elapsed_secs,
            stars,
            hints_used: self.hints_used,
        };
        if let Err(err) = self.collaborators.progress.save_level_result(&result) {
            warn!(level = self.level, error = %err, "failed to save level result");
        }

        let report = LevelCompletionReport {
            level: self.level,
            moves: self.moves,
            time_remaining,
            time_spent: self.elapsed_secs,
            hints_used: self.hints_used,
            is_perfect: is_perfect(self.moves, self.level),
        };
        if let Err(err) = self.collaborators.reporter.report_level_completion(&report) {
            warn!(level = self.level, error = %err, "failed to report level completion");
        }

        self.cue(Cue::Victory);
        info!(level = self.level, moves = self.moves, stars, "level completed");
        self.sink.emit(SessionEvent::LevelCompleted {
            level: self.level,
            moves: self.moves,
            time_remaining,
            stars,
        });
    }

    fn cue(&mut self, cue: Cue) {
        self.collaborators.cues.play_cue(cue);
    }

    fn emit_time(&mut self) {
        self.sink.emit(SessionEvent::TimeUpdated {
            time_remaining: self.countdown.remaining(),
            time_limit: self.countdown.limit(),
        });
    }

    fn emit_state(&mut self) {
        let snapshot = self.snapshot();
        self.sink.emit(SessionEvent::StateChanged(snapshot));
    }
}

impl<S: EventSink> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("level", &self.level)
            .field("status", &self.status)
            .field("moves", &self.moves)
            .field("selected", &self.selected)
            .field("time_remaining", &self.countdown.remaining())
            .finish_non_exhaustive()
    }
}
