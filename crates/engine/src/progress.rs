//! Player progress and the in-memory store
//!
//! `Progress::record` is the single place that folds a finished level into
//! the saved state; file-backed stores reuse it so every store agrees on the rules:
//!
//! - the resume level becomes `level + 1` (capped at `MAX_LEVEL`)
//! - `max_level_reached` never decreases
//! - the best record per level is replaced only by one with fewer moves

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use ball_sort_core::types::{MAX_LEVEL, MIN_LEVEL};

use crate::collaborators::{PersistenceError, ProgressStore};

/// Outcome of one completed level, as handed to the progress store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelResult {
    pub level: u32,
    pub moves: u32,
    pub time_remaining: u32,
    /// Seconds spent before completion.
    pub time_spent: u32,
    pub stars: u8,
    pub hints_used: u32,
}

/// Best finish of a single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRecord {
    pub moves: u32,
    pub time_spent: u32,
    pub stars: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalStats {
    pub total_moves: u64,
    pub total_time_secs: u64,
    pub hints_used: u64,
    pub levels_completed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Level to resume at.
    pub current_level: u32,
    pub max_level_reached: u32,
    pub totals: TotalStats,
    pub best: BTreeMap<u32, LevelRecord>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            current_level: MIN_LEVEL,
            max_level_reached: MIN_LEVEL,
            totals: TotalStats::default(),
            best: BTreeMap::new(),
        }
    }
}

impl Progress {
    /// Fold a completed level in. Returns true when it set a new best record.
    pub fn record(&mut self, result: &LevelResult) -> bool {
        let next = result.level.saturating_add(1).min(MAX_LEVEL);
        self.current_level = next;
        self.max_level_reached = self.max_level_reached.max(next);

        self.totals.total_moves += u64::from(result.moves);
        self.totals.total_time_secs += u64::from(result.time_spent);
        self.totals.hints_used += u64::from(result.hints_used);

        let candidate = LevelRecord {
            moves: result.moves,
            time_spent: result.time_spent,
            stars: result.stars,
        };
        match self.best.get(&result.level) {
            None => {
                self.totals.levels_completed += 1;
                self.best.insert(result.level, candidate);
                true
            }
            Some(existing) if candidate.moves < existing.moves => {
                self.best.insert(result.level, candidate);
                true
            }
            Some(_) => false,
        }
    }

    pub fn best_for(&self, level: u32) -> Option<&LevelRecord> {
        self.best.get(&level)
    }
}

/// Progress kept in memory. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    inner: Arc<Mutex<Progress>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: Progress) -> Self {
        Self {
            inner: Arc::new(Mutex::new(progress)),
        }
    }

    /// Copy of the current state.
    pub fn progress(&self) -> Result<Progress, PersistenceError> {
        self.load_progress()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn save_level_result(&mut self, result: &LevelResult) -> Result<(), PersistenceError> {
        let mut progress = self.inner.lock().map_err(|_| PersistenceError::Poisoned)?;
        progress.record(result);
        Ok(())
    }

    fn load_progress(&self) -> Result<Progress, PersistenceError> {
        let progress = self.inner.lock().map_err(|_| PersistenceError::Poisoned)?;
        Ok(progress.clone())
    }

    fn reset(&mut self) -> Result<(), PersistenceError> {
        let mut progress = self.inner.lock().map_err(|_| PersistenceError::Poisoned)?;
        *progress = Progress::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(level: u32, moves: u32) -> LevelResult {
        LevelResult {
            level,
            moves,
            time_remaining: 30,
            time_spent: 30,
            stars: 2,
            hints_used: 1,
        }
    }

    #[test]
    fn test_default_starts_at_level_one() {
        let p = Progress::default();
        assert_eq!(p.current_level, 1);
        assert_eq!(p.max_level_reached, 1);
        assert!(p.best.is_empty());
    }

    #[test]
    fn test_record_advances_levels() {
        let mut p = Progress::default();
        p.record(&result(1, 20));
        assert_eq!(p.current_level, 2);
        assert_eq!(p.max_level_reached, 2);
        assert_eq!(p.totals.levels_completed, 1);
        assert_eq!(p.totals.total_moves, 20);
        assert_eq!(p.totals.total_time_secs, 30);
        assert_eq!(p.totals.hints_used, 1);
    }

    #[test]
    fn test_replaying_lower_level_keeps_max() {
        let mut p = Progress::default();
        p.record(&result(9, 20));
        p.record(&result(3, 20));
        assert_eq!(p.current_level, 4);
        assert_eq!(p.max_level_reached, 10);
    }

    #[test]
    fn test_best_keeps_fewest_moves() {
        let mut p = Progress::default();
        assert!(p.record(&result(5, 20)));
        assert!(!p.record(&result(5, 25)));
        assert_eq!(p.best_for(5).unwrap().moves, 20);
        assert!(p.record(&result(5, 14)));
        assert_eq!(p.best_for(5).unwrap().moves, 14);
        assert_eq!(p.totals.levels_completed, 1);
        assert_eq!(p.totals.total_moves, 59);
    }

    #[test]
    fn test_last_level_caps() {
        let mut p = Progress::default();
        p.record(&result(MAX_LEVEL, 60));
        assert_eq!(p.current_level, MAX_LEVEL);
        assert_eq!(p.max_level_reached, MAX_LEVEL);
    }

    #[test]
    fn test_memory_store_shared_between_clones() {
        let store = MemoryProgressStore::new();
        let mut writer = store.clone();
        writer.save_level_result(&result(1, 12)).unwrap();
        assert_eq!(store.progress().unwrap().current_level, 2);

        writer.reset().unwrap();
        assert_eq!(store.progress().unwrap(), Progress::default());
    }
}
