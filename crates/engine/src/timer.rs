//! Countdown timer with a cancellation epoch
//!
//! The countdown does not own a clock. Something outside (the binary's ticker,
//! a test) calls [`Countdown::tick`] once per `TICK_MS` with the epoch it was
//! scheduled under. Every restart bumps the epoch, so ticks queued for a replaced
//! level are ignored instead of draining the new level's time.

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick was scheduled under an older epoch.
    Stale,
    /// Countdown is stopped (paused, completed, or expired).
    Stopped,
    /// One second elapsed; time is left.
    Running { remaining: u32 },
    /// This tick took the countdown to zero.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    limit: u32,
    remaining: u32,
    running: bool,
    epoch: u64,
}

impl Countdown {
    /// A stopped countdown at `limit` seconds.
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: limit,
            running: false,
            epoch: 0,
        }
    }

    /// Reset to `limit`, start running and invalidate earlier ticks.
    pub fn restart(&mut self, limit: u32) -> u64 {
        self.limit = limit;
        self.remaining = limit;
        self.running = true;
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Continue from where `stop` left off. No effect once expired.
    pub fn resume(&mut self) {
        if self.remaining > 0 {
            self.running = true;
        }
    }

    /// Add reward seconds. The limit is unchanged.
    pub fn extend(&mut self, secs: u32) {
        self.remaining = self.remaining.saturating_add(secs);
    }

    pub fn tick(&mut self, epoch: u64) -> TickOutcome {
        if epoch != self.epoch {
            return TickOutcome::Stale;
        }
        if !self.running {
            return TickOutcome::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining: self.remaining,
            }
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
