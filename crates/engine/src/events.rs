//! Session events and the sinks that receive them
//!
//! Events are plain values pushed in mutation order. The session never waits on
//! a sink; a sink that cannot deliver drops the event.

use std::sync::mpsc;

use ball_sort_core::types::{MoveRejection, Piece, SessionStatus};

/// Read-only view of a session, rebuilt after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub level: u32,
    pub max_level_reached: u32,
    pub status: SessionStatus,
    pub moves: u32,
    pub selected: Option<usize>,
    pub hints_used: u32,
    pub hints_remaining: u32,
    pub time_remaining: u32,
    pub time_limit: u32,
    /// Countdown epoch; changes on every level load.
    pub epoch: u64,
    pub capacity: usize,
    /// Tube contents, bottom-first.
    pub tubes: Vec<Vec<Piece>>,
    pub can_undo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StateChanged(SessionSnapshot),
    MoveCompleted {
        from: usize,
        to: usize,
        moved: usize,
    },
    MoveRejected {
        from: usize,
        to: usize,
        reason: MoveRejection,
    },
    LevelCompleted {
        level: u32,
        moves: u32,
        time_remaining: u32,
        stars: u8,
    },
    TimeUpdated {
        time_remaining: u32,
        time_limit: u32,
    },
}

impl SessionEvent {
    /// Short name used in logs and on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::StateChanged(_) => "stateChanged",
            SessionEvent::MoveCompleted { .. } => "moveCompleted",
            SessionEvent::MoveRejected { .. } => "moveRejected",
            SessionEvent::LevelCompleted { .. } => "levelCompleted",
            SessionEvent::TimeUpdated { .. } => "timeUpdated",
        }
    }
}

/// Receiver of session events.
pub trait EventSink {
    fn emit(&mut self, event: SessionEvent);
}

impl EventSink for Vec<SessionEvent> {
    fn emit(&mut self, event: SessionEvent) {
        self.push(event);
    }
}

impl EventSink for mpsc::Sender<SessionEvent> {
    fn emit(&mut self, event: SessionEvent) {
        // A dropped receiver just means nobody is listening.
        let _ = self.send(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: SessionEvent) {
        (**self).emit(event);
    }
}
