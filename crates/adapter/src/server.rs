//! TCP server for the controller adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use crate::protocol::*;
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage};

pub const DEFAULT_PORT: u16 = 7878;
pub const DEFAULT_MAX_PENDING: usize = 16;

fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: DEFAULT_MAX_PENDING,
        }
    }
}

impl ServerConfig {
    /// Read `BALL_SORT_HOST`, `BALL_SORT_PORT` and `BALL_SORT_MAX_PENDING`.
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("BALL_SORT_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("BALL_SORT_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = env::var("BALL_SORT_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            max_pending_commands,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("{}:{} resolved to no address", self.host, self.port))
    }

    /// Major version clients must match, e.g. `"1."` for `1.0.0`.
    fn major_prefix(&self) -> String {
        let major = self
            .protocol_version
            .split('.')
            .next()
            .unwrap_or(&self.protocol_version);
        format!("{major}.")
    }
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: Arc<RwLock<Vec<ClientHandle>>>,
    controller: Arc<RwLock<Option<usize>>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: Arc::new(RwLock::new(Vec::new())),
            controller: Arc::new(RwLock::new(None)),
        }
    }

    /// Check if the adapter is disabled via `BALL_SORT_ADAPTER_DISABLED`
    pub fn is_disabled() -> bool {
        std::env::var("BALL_SORT_ADAPTER_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

async fn is_handshaken(state: &Arc<ServerState>, client_id: usize) -> bool {
    let clients = state.clients.read().await;
    clients
        .iter()
        .find(|c| c.id == client_id)
        .map(|c| c.handshaken)
        .unwrap_or(false)
}

async fn check_and_update_seq(state: &Arc<ServerState>, client_id: usize, seq: u64) -> bool {
    let mut clients = state.clients.write().await;
    let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
        return true;
    };

    match client.last_seq {
        Some(prev) if seq <= prev => false,
        _ => {
            client.last_seq = Some(seq);
            true
        }
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub is_controller: bool,
    pub stream_events: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Line(String),
    Ack(AckMessage),
    Error(ErrorMessage),
    Welcome(WelcomeMessage),
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind adapter on {addr}"))?;
    let bound = listener.local_addr()?;
    info!(%bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let clients = state.clients.read().await;
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                            let _ = c.tx.send(ClientOutbound::Line(line));
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        for c in clients.iter().filter(|c| c.stream_events) {
                            let _ = c.tx.send(ClientOutbound::Line(line.clone()));
                        }
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(client_id, %addr, "client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, state, command_tx).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Serialize one outbound message as a JSON line.
async fn write_outbound<W>(writer: &mut W, buf: &mut Vec<u8>, msg: ClientOutbound) -> bool
where
    W: AsyncWrite + Unpin,
{
    buf.clear();
    let encoded = match msg {
        ClientOutbound::Line(line) => {
            buf.extend_from_slice(line.as_bytes());
            Ok(())
        }
        ClientOutbound::Ack(ack) => serde_json::to_writer(&mut *buf, &ack),
        ClientOutbound::Error(err) => serde_json::to_writer(&mut *buf, &err),
        ClientOutbound::Welcome(welcome) => serde_json::to_writer(&mut *buf, &welcome),
    };
    if encoded.is_err() {
        // Nothing was written; keep the connection.
        return true;
    }
    if !buf.ends_with(b"\n") {
        buf.push(b'\n');
    }
    writer.write_all(buf).await.is_ok() && writer.flush().await.is_ok()
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            is_controller: false,
            stream_events: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            if !write_outbound(&mut writer, &mut buf, msg).await {
                break;
            }
        }
    });

    let send_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!(client_id, line = trimmed, "inbound");

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if is_handshaken(&state, client_id).await
                    && !check_and_update_seq(&state, client_id, hello.seq).await
                {
                    send_error(
                        hello.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }

                if !hello
                    .protocol_version
                    .starts_with(&state.config.major_prefix())
                {
                    send_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                // First client to hello becomes controller.
                let (role, controller_id) = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    if controller.is_none() {
                        *controller = Some(client_id);
                        info!(client_id, "client is now controller");
                    }
                    let is_controller = *controller == Some(client_id);
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.is_controller = is_controller;
                        client.stream_events = hello.requested.stream_events;
                    }
                    let role = if is_controller {
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    };
                    (role, *controller)
                };

                let welcome = create_welcome(
                    hello.seq,
                    &state.config.protocol_version,
                    client_id,
                    role,
                    controller_id,
                );
                let _ = tx.send(ClientOutbound::Welcome(welcome));

                if hello.requested.stream_events
                    && command_tx
                        .try_send(InboundCommand {
                            client_id,
                            seq: hello.seq,
                            payload: InboundPayload::SnapshotRequest,
                        })
                        .is_err()
                {
                    warn!(client_id, "command queue full, initial snapshot dropped");
                    send_error(
                        hello.seq,
                        ErrorCode::Backpressure,
                        "Command queue is full; initial snapshot not sent",
                    );
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !is_handshaken(&state, client_id).await {
                    send_error(
                        cmd.seq,
                        ErrorCode::HandshakeRequired,
                        "Send hello before command",
                    );
                    continue;
                }

                if !check_and_update_seq(&state, client_id, cmd.seq).await {
                    send_error(
                        cmd.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }

                let is_controller = *state.controller.read().await == Some(client_id);
                if !is_controller {
                    send_error(
                        cmd.seq,
                        ErrorCode::NotController,
                        "Only controller may send commands",
                    );
                    continue;
                }

                let action = match cmd.to_action() {
                    Ok(action) => action,
                    Err(message) => {
                        send_error(cmd.seq, ErrorCode::InvalidCommand, &message);
                        continue;
                    }
                };

                // Ack is sent by the game loop once the action is applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Command(action),
                    })
                    .is_err()
                {
                    send_error(cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            Ok(ParsedMessage::Control(ctrl)) => {
                if !is_handshaken(&state, client_id).await {
                    send_error(
                        ctrl.seq,
                        ErrorCode::HandshakeRequired,
                        "Send hello before control",
                    );
                    continue;
                }

                if !check_and_update_seq(&state, client_id, ctrl.seq).await {
                    send_error(
                        ctrl.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }

                let mut controller = state.controller.write().await;
                let mut clients = state.clients.write().await;
                match ctrl.action {
                    ControlAction::Claim => {
                        if controller.is_none() || *controller == Some(client_id) {
                            *controller = Some(client_id);
                            if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                                client.is_controller = true;
                            }
                            info!(client_id, "controller claimed");
                            let _ = tx.send(ClientOutbound::Ack(create_ack(ctrl.seq, None)));
                        } else {
                            send_error(
                                ctrl.seq,
                                ErrorCode::ControllerActive,
                                "Controller already assigned",
                            );
                        }
                    }
                    ControlAction::Release => {
                        if *controller == Some(client_id) {
                            *controller = None;
                            if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                                client.is_controller = false;
                            }
                            info!(client_id, "controller released");
                            let _ = tx.send(ClientOutbound::Ack(create_ack(ctrl.seq, None)));
                        } else {
                            send_error(
                                ctrl.seq,
                                ErrorCode::NotController,
                                "Only controller may release",
                            );
                        }
                    }
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                if is_handshaken(&state, client_id).await
                    && !check_and_update_seq(&state, client_id, unknown.seq).await
                {
                    send_error(
                        unknown.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }
                send_error(unknown.seq, ErrorCode::InvalidCommand, "Unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                send_error(
                    seq,
                    ErrorCode::InvalidCommand,
                    &format!("JSON parse error: {e}"),
                );
            }
        }
    }

    // Remove the client and promote the lowest remaining id if it held control.
    {
        let mut controller = state.controller.write().await;
        let mut clients = state.clients.write().await;

        let was_controller = *controller == Some(client_id);
        clients.retain(|c| c.id != client_id);

        if was_controller {
            let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
            *controller = next_id;
            match next_id {
                Some(new_id) => {
                    if let Some(c) = clients.iter_mut().find(|c| c.id == new_id) {
                        c.is_controller = true;
                    }
                    info!(client_id = new_id, "controller promoted");
                }
                None => info!(client_id, "controller released"),
            }
        }
    }

    drop(send_error);
    drop(tx);
    let _ = write_task.await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"type":"command","seq": 42,"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"seq":"x"}"#), None);
        assert_eq!(extract_seq_best_effort("not json"), None);
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 7878);
        assert_eq!(config.max_pending_commands, 16);
        assert_eq!(config.major_prefix(), "1.");
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:7878".parse::<SocketAddr>().unwrap()
        );
    }

    #[tokio::test]
    async fn test_seq_must_increase() {
        let state = Arc::new(ServerState::new(ServerConfig::default()));
        let (tx, _rx) = mpsc::unbounded_channel();
        state.clients.write().await.push(ClientHandle {
            id: 1,
            addr: "127.0.0.1:1".parse().unwrap(),
            is_controller: false,
            stream_events: false,
            handshaken: true,
            last_seq: Some(5),
            tx,
        });

        assert!(!check_and_update_seq(&state, 1, 5).await);
        assert!(!check_and_update_seq(&state, 1, 3).await);
        assert!(check_and_update_seq(&state, 1, 6).await);
        assert!(is_handshaken(&state, 1).await);
        assert!(!is_handshaken(&state, 2).await);
    }
}
