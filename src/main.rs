//! Headless ball-sort runner (default binary).
//!
//! Runs one session, drives its countdown from a fixed tick, and exposes it to
//! remote controllers through the TCP adapter. Progress is saved to a JSON file.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ball_sort::adapter::{Adapter, JsonFileProgressStore, TracingCues, TracingReporter};
use ball_sort::engine::{Collaborators, Session, SessionEvent};
use ball_sort::types::TICK_MS;
use ball_sort::Ticker;

/// How long the loop sleeps between polls for controller commands.
const POLL_MS: u64 = 10;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = JsonFileProgressStore::from_env();
    info!(path = %store.path().display(), "progress file");
    let collaborators = Collaborators::default()
        .with_progress(store)
        .with_reporter(TracingReporter::new())
        .with_cues(TracingCues);

    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>();
    let mut session = match seed_from_env() {
        Some(seed) => Session::start_seeded(collaborators, event_tx, seed),
        None => Session::start(collaborators, event_tx),
    };

    let mut adapter = Adapter::start_from_env()?;
    run(&mut session, adapter.as_mut(), &event_rx);
    Ok(())
}

/// `BALL_SORT_SEED` makes board generation reproducible.
fn seed_from_env() -> Option<u64> {
    std::env::var("BALL_SORT_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

fn run(
    session: &mut Session<mpsc::Sender<SessionEvent>>,
    mut adapter: Option<&mut Adapter>,
    events: &mpsc::Receiver<SessionEvent>,
) {
    let poll = Duration::from_millis(POLL_MS);
    let mut ticker = Ticker::new(Duration::from_millis(TICK_MS), session, Instant::now());

    loop {
        if let Some(adapter) = adapter.as_deref_mut() {
            while let Some(inbound) = adapter.try_recv() {
                // Events are flushed before the reply so clients see the new state first.
                let reply = ball_sort::adapter::apply_inbound(session, &inbound);
                flush_events(events, Some(&mut *adapter));
                if let Some(reply) = reply {
                    adapter.send(reply);
                }
            }
        }

        let now = Instant::now();
        ticker.poll(session, now);
        flush_events(events, adapter.as_deref_mut());

        std::thread::sleep(ticker.until_next(now).min(poll));
    }
}

fn flush_events(events: &mpsc::Receiver<SessionEvent>, mut adapter: Option<&mut Adapter>) {
    while let Ok(event) = events.try_recv() {
        debug!(event = event.name(), "session event");
        if let Some(adapter) = adapter.as_deref_mut() {
            adapter.broadcast_event(&event);
        }
    }
}
