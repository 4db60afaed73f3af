//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server.

use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::engine::{EventSink, Session, SessionEvent};
use crate::protocol::{create_ack, create_error, create_event, ErrorCode};
use crate::server::{run_server, ServerConfig, ServerState};
use crate::types::GameAction;

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundPayload {
    Command(GameAction),
    /// A streaming client just joined and needs the current state.
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    Broadcast { line: String },
}

/// Encode a session event as a wire line.
pub fn encode_event(seq: u64, event: &SessionEvent) -> Option<String> {
    match serde_json::to_string(&create_event(seq, event)) {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(event = event.name(), error = %e, "failed to encode event");
            None
        }
    }
}

/// Apply one inbound command to the session and build the reply for its sender.
///
/// Session events raised by the command go through the session's own sink.
pub fn apply_inbound<S: EventSink>(
    session: &mut Session<S>,
    inbound: &InboundCommand,
) -> Option<OutboundMessage> {
    let line = match inbound.payload {
        InboundPayload::Command(action) => {
            let reply = match session.apply_action(action) {
                Ok(hint) => serde_json::to_string(&create_ack(inbound.seq, hint)),
                Err(e) => serde_json::to_string(&create_error(
                    inbound.seq,
                    ErrorCode::Rejected,
                    &e.to_string(),
                )),
            };
            match reply {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "failed to encode reply");
                    return None;
                }
            }
        }
        InboundPayload::SnapshotRequest => {
            encode_event(inbound.seq, &SessionEvent::StateChanged(session.snapshot()))?
        }
    };

    Some(OutboundMessage::ToClient {
        client_id: inbound.client_id,
        line,
    })
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    next_event_seq: u64,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `BALL_SORT_ADAPTER_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if ServerState::is_disabled() {
            info!("adapter disabled via BALL_SORT_ADAPTER_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    /// Bind the server on its own runtime. Returns once the listener is up.
    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (ready_tx, ready_rx) = oneshot::channel();

        let rt = Runtime::new()?;
        let server = rt.spawn(async move {
            let result = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
            if let Err(e) = &result {
                error!(error = %e, "adapter server stopped");
            }
            result
        });

        if rt.block_on(ready_rx).is_err() {
            // The server exited before binding; surface its error.
            return match rt.block_on(server) {
                Ok(Err(e)) => Err(e),
                Ok(Ok(())) => Err(anyhow::anyhow!("adapter server exited before binding")),
                Err(e) => Err(e.into()),
            };
        }

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            next_event_seq: 0,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    /// Apply an inbound command and deliver the reply to its sender.
    pub fn dispatch<S: EventSink>(&self, session: &mut Session<S>, inbound: &InboundCommand) {
        if let Some(reply) = apply_inbound(session, inbound) {
            self.send(reply);
        }
    }

    /// Push a session event to every streaming client.
    pub fn broadcast_event(&mut self, event: &SessionEvent) {
        self.next_event_seq += 1;
        if let Some(line) = encode_event(self.next_event_seq, event) {
            self.send(OutboundMessage::Broadcast { line });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Collaborators;
    use crate::types::SessionStatus;

    fn session() -> Session {
        Session::start_seeded(Collaborators::default(), Vec::new(), 11)
    }

    fn line_of(msg: Option<OutboundMessage>) -> (usize, serde_json::Value) {
        match msg {
            Some(OutboundMessage::ToClient { client_id, line }) => {
                (client_id, serde_json::from_str(&line).unwrap())
            }
            other => panic!("expected a client reply, got {other:?}"),
        }
    }

    #[test]
    fn test_command_is_acked() {
        let mut session = session();
        let inbound = InboundCommand {
            client_id: 3,
            seq: 8,
            payload: InboundPayload::Command(GameAction::Pause),
        };
        let (client_id, v) = line_of(apply_inbound(&mut session, &inbound));
        assert_eq!(client_id, 3);
        assert_eq!(v["type"], "ack");
        assert_eq!(v["seq"], 8);
        assert_eq!(session.status(), SessionStatus::Paused);
    }

    #[test]
    fn test_refused_action_is_rejected() {
        let mut session = session();
        let inbound = InboundCommand {
            client_id: 1,
            seq: 2,
            payload: InboundPayload::Command(GameAction::GoToLevel { level: 9 }),
        };
        let (_, v) = line_of(apply_inbound(&mut session, &inbound));
        assert_eq!(v["type"], "error");
        assert_eq!(v["code"], "rejected");
        assert_eq!(v["message"], "level 9 is locked (reached 1)");
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn test_hint_travels_in_ack() {
        let mut session = session();
        let inbound = InboundCommand {
            client_id: 1,
            seq: 4,
            payload: InboundPayload::Command(GameAction::Hint),
        };
        let (_, v) = line_of(apply_inbound(&mut session, &inbound));
        assert_eq!(v["type"], "ack");
        assert!(v["hint"]["from"].is_u64());
        assert_eq!(session.hints_used(), 1);
    }

    #[test]
    fn test_snapshot_request_returns_state() {
        let mut session = session();
        let inbound = InboundCommand {
            client_id: 5,
            seq: 1,
            payload: InboundPayload::SnapshotRequest,
        };
        let (client_id, v) = line_of(apply_inbound(&mut session, &inbound));
        assert_eq!(client_id, 5);
        assert_eq!(v["type"], "event");
        assert_eq!(v["event"]["name"], "stateChanged");
        assert_eq!(v["event"]["level"], 1);
        assert_eq!(v["event"]["tubes"].as_array().unwrap().len(), 5);
    }
}
