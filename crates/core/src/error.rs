use crate::types::{MAX_LEVEL, MIN_LEVEL};

/// Errors from strict level lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("level {level} is outside the supported range {min}..={max}", min = MIN_LEVEL, max = MAX_LEVEL)]
    OutOfRange { level: u32 },
}
