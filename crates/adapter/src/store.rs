//! File-backed progress store
//!
//! Progress is one pretty-printed JSON document. Saves write a sibling
//! `.tmp` file and rename it over the old one, so a crash mid-write leaves
//! the previous state readable.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{
    LevelRecord, LevelResult, PersistenceError, Progress, ProgressStore, TotalStats,
};
use crate::types::{MAX_LEVEL, MIN_LEVEL};

/// Default location when `BALL_SORT_PROGRESS_PATH` is unset.
pub const DEFAULT_PROGRESS_PATH: &str = "ball-sort-progress.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredProgress {
    current_level: u32,
    max_level_reached: u32,
    #[serde(default)]
    totals: StoredTotals,
    #[serde(default)]
    best: BTreeMap<u32, StoredRecord>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct StoredTotals {
    total_moves: u64,
    total_time_secs: u64,
    hints_used: u64,
    levels_completed: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StoredRecord {
    moves: u32,
    time_spent: u32,
    stars: u8,
}

impl From<&Progress> for StoredProgress {
    fn from(p: &Progress) -> Self {
        Self {
            current_level: p.current_level,
            max_level_reached: p.max_level_reached,
            totals: StoredTotals {
                total_moves: p.totals.total_moves,
                total_time_secs: p.totals.total_time_secs,
                hints_used: p.totals.hints_used,
                levels_completed: p.totals.levels_completed,
            },
            best: p
                .best
                .iter()
                .map(|(level, r)| {
                    (
                        *level,
                        StoredRecord {
                            moves: r.moves,
                            time_spent: r.time_spent,
                            stars: r.stars,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl StoredProgress {
    fn into_progress(self) -> Result<Progress, PersistenceError> {
        let range = MIN_LEVEL..=MAX_LEVEL;
        if !range.contains(&self.current_level) || !range.contains(&self.max_level_reached) {
            return Err(PersistenceError::Malformed(format!(
                "level {} / max {} outside {MIN_LEVEL}..={MAX_LEVEL}",
                self.current_level, self.max_level_reached
            )));
        }
        Ok(Progress {
            current_level: self.current_level.min(self.max_level_reached),
            max_level_reached: self.max_level_reached,
            totals: TotalStats {
                total_moves: self.totals.total_moves,
                total_time_secs: self.totals.total_time_secs,
                hints_used: self.totals.hints_used,
                levels_completed: self.totals.levels_completed,
            },
            best: self
                .best
                .into_iter()
                .map(|(level, r)| {
                    (
                        level,
                        LevelRecord {
                            moves: r.moves,
                            time_spent: r.time_spent,
                            stars: r.stars,
                        },
                    )
                })
                .collect(),
        })
    }
}

/// Progress persisted as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileProgressStore {
    path: PathBuf,
}

impl JsonFileProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `BALL_SORT_PROGRESS_PATH`, or [`DEFAULT_PROGRESS_PATH`].
    pub fn from_env() -> Self {
        let path = std::env::var("BALL_SORT_PROGRESS_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PROGRESS_PATH.to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, progress: &Progress) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&StoredProgress::from(progress))
            .map_err(|e| PersistenceError::Malformed(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "progress saved");
        Ok(())
    }
}

impl ProgressStore for JsonFileProgressStore {
    fn save_level_result(&mut self, result: &LevelResult) -> Result<(), PersistenceError> {
        let mut progress = match self.load_progress() {
            Ok(progress) => progress,
            Err(PersistenceError::Malformed(reason)) => {
                warn!(
                    path = %self.path.display(),
                    %reason,
                    "progress file is malformed, starting it over"
                );
                Progress::default()
            }
            Err(err) => return Err(err),
        };
        progress.record(result);
        self.write(&progress)
    }

    fn load_progress(&self) -> Result<Progress, PersistenceError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Progress::default()),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredProgress = serde_json::from_str(&json)
            .map_err(|e| PersistenceError::Malformed(e.to_string()))?;
        stored.into_progress()
    }

    fn reset(&mut self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
