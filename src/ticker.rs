//! Fixed-period tick scheduling for a session's countdown.
//!
//! The runner polls [`Ticker::poll`] with the current time. A tick is delivered
//! once a full period has passed since the countdown was (re)armed, always under
//! the epoch the ticker armed with. When the session starts a new countdown
//! (restart, next level, go to level) the ticker re-arms from that instant, so the
//! first tick of a new level is a full period away.

use std::time::{Duration, Instant};

use ball_sort_engine::{EventSink, Session, TickOutcome};

#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    last_tick: Instant,
    epoch: u64,
}

impl Ticker {
    /// Arm for the countdown `session` is running now.
    pub fn new<S: EventSink>(period: Duration, session: &Session<S>, now: Instant) -> Self {
        Self {
            period,
            last_tick: now,
            epoch: session.epoch(),
        }
    }

    /// Deliver at most one tick due at `now`.
    ///
    /// Returns `None` when nothing was due or the ticker just re-armed.
    pub fn poll<S: EventSink>(
        &mut self,
        session: &mut Session<S>,
        now: Instant,
    ) -> Option<TickOutcome> {
        if session.epoch() != self.epoch {
            self.epoch = session.epoch();
            self.last_tick = now;
            return None;
        }
        if now.saturating_duration_since(self.last_tick) < self.period {
            return None;
        }
        self.last_tick += self.period;
        Some(session.tick_epoch(self.epoch))
    }

    /// Time left until the next tick is due.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.period
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ball_sort_engine::{Collaborators, SessionEvent};

    const PERIOD: Duration = Duration::from_millis(1000);

    fn session() -> Session<Vec<SessionEvent>> {
        Session::start_seeded(Collaborators::default(), Vec::new(), 11)
    }

    #[test]
    fn test_ticks_once_per_period() {
        let mut session = session();
        let t0 = Instant::now();
        let mut ticker = Ticker::new(PERIOD, &session, t0);

        assert_eq!(ticker.poll(&mut session, t0 + Duration::from_millis(999)), None);
        assert_eq!(
            ticker.poll(&mut session, t0 + PERIOD),
            Some(TickOutcome::Running { remaining: 59 })
        );
        assert_eq!(ticker.poll(&mut session, t0 + Duration::from_millis(1500)), None);
        assert_eq!(
            ticker.until_next(t0 + Duration::from_millis(1500)),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_paused_session_reports_stopped() {
        let mut session = session();
        let t0 = Instant::now();
        let mut ticker = Ticker::new(PERIOD, &session, t0);
        session.pause();
        assert_eq!(ticker.poll(&mut session, t0 + PERIOD), Some(TickOutcome::Stopped));
        assert_eq!(session.time_remaining(), 60);
    }
}
