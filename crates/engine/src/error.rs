use ball_sort_core::types::{MoveRejection, SessionStatus, MAX_LEVEL, MIN_LEVEL};

/// Why a session refused an action. The session is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("level {level} is outside {min}..={max}", min = MIN_LEVEL, max = MAX_LEVEL)]
    LevelOutOfRange { level: u32 },

    #[error("level {level} is locked (reached {max_level_reached})")]
    LevelLocked { level: u32, max_level_reached: u32 },

    #[error("level is not completed (status {})", .status.as_str())]
    NotCompleted { status: SessionStatus },

    #[error("session is not playing (status {})", .status.as_str())]
    NotPlaying { status: SessionStatus },

    #[error("session is not paused (status {})", .status.as_str())]
    NotPaused { status: SessionStatus },

    #[error("level is over (status {})", .status.as_str())]
    LevelFinished { status: SessionStatus },

    #[error("move rejected: {}", .0.as_str())]
    MoveRejected(MoveRejection),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("no hints left")]
    HintsExhausted,

    #[error("no legal move available")]
    NoMoveAvailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SessionError::LevelOutOfRange { level: 0 }.to_string(),
            "level 0 is outside 1..=1000"
        );
        assert_eq!(
            SessionError::NotCompleted {
                status: SessionStatus::TimeUp
            }
            .to_string(),
            "level is not completed (status timeUp)"
        );
        assert_eq!(
            SessionError::MoveRejected(MoveRejection::DestinationFull).to_string(),
            "move rejected: destination_full"
        );
    }
}
