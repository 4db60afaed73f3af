//! Log-only collaborators for headless runs.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::core::Milestone;
use crate::engine::{AchievementReporter, CueSink, LevelCompletionReport, ReportError};
use crate::types::Cue;

/// Reports completions and achievement progress through `tracing`.
///
/// Milestone levels, the first perfect level and the first fast completion
/// unlock once. Perfect and hint-free completions are counted.
#[derive(Debug, Clone, Default)]
pub struct TracingReporter {
    unlocked: BTreeSet<u32>,
    perfect_levels: u32,
    no_hint_levels: u32,
    perfect_unlocked: bool,
    speed_unlocked: bool,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milestone levels already announced by this reporter.
    pub fn unlocked(&self) -> impl Iterator<Item = u32> + '_ {
        self.unlocked.iter().copied()
    }

    pub fn perfect_levels(&self) -> u32 {
        self.perfect_levels
    }

    pub fn no_hint_levels(&self) -> u32 {
        self.no_hint_levels
    }

    pub fn speed_unlocked(&self) -> bool {
        self.speed_unlocked
    }

    pub fn perfect_unlocked(&self) -> bool {
        self.perfect_unlocked
    }
}

impl AchievementReporter for TracingReporter {
    fn report_level_completion(
        &mut self,
        report: &LevelCompletionReport,
    ) -> Result<(), ReportError> {
        info!(
            level = report.level,
            moves = report.moves,
            time_remaining = report.time_remaining,
            time_spent = report.time_spent,
            hints_used = report.hints_used,
            perfect = report.is_perfect,
            "level completed"
        );
        if let Some(milestone) = Milestone::for_level(report.level) {
            if self.unlocked.insert(report.level) {
                info!(achievement = milestone.as_str(), "achievement unlocked");
            }
        }
        if report.is_perfect {
            self.perfect_levels += 1;
            info!(count = self.perfect_levels, "perfect_levels");
            if !self.perfect_unlocked {
                self.perfect_unlocked = true;
                info!(achievement = "perfect_level", "achievement unlocked");
            }
        }
        if report.is_fast() && !self.speed_unlocked {
            self.speed_unlocked = true;
            info!(
                achievement = "speed_demon",
                time_spent = report.time_spent,
                "achievement unlocked"
            );
        }
        if report.used_no_hints() {
            self.no_hint_levels += 1;
            info!(count = self.no_hint_levels, "no_hints");
        }
        Ok(())
    }
}

/// Logs cues at debug level instead of playing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCues;

impl CueSink for TracingCues {
    fn play_cue(&mut self, cue: Cue) {
        debug!(cue = cue.as_str(), "cue");
    }
}
