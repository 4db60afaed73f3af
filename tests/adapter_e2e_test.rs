use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use ball_sort::adapter::protocol::create_hello;
use ball_sort::adapter::server::{run_server, ServerConfig};
use ball_sort::adapter::{apply_inbound, encode_event, InboundCommand, OutboundMessage};
use ball_sort::engine::{Collaborators, Session, SessionEvent};

type Lines = tokio::io::Lines<BufReader<OwnedReadHalf>>;

async fn read_json_line(lines: &mut Lines) -> serde_json::Value {
    let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .expect("timeout waiting for line")
        .expect("io error")
        .expect("expected line");
    serde_json::from_str(&line).expect("invalid json")
}

/// Read until a message of `msg_type` arrives, skipping streamed events.
async fn read_until(lines: &mut Lines, msg_type: &str) -> serde_json::Value {
    loop {
        let v = read_json_line(lines).await;
        if v["type"] == msg_type {
            return v;
        }
    }
}

async fn send_line(write: &mut OwnedWriteHalf, line: &str) {
    write.write_all(line.as_bytes()).await.unwrap();
    write.write_all(b"\n").await.unwrap();
    write.flush().await.unwrap();
}

async fn connect(addr: SocketAddr) -> (Lines, OwnedWriteHalf) {
    let stream = TcpStream::connect(addr).await.expect("connect failed");
    let (read_half, write_half) = stream.into_split();
    (BufReader::new(read_half).lines(), write_half)
}

async fn hello(write: &mut OwnedWriteHalf, seq: u64, stream_events: bool) {
    let mut hello = create_hello(seq, "e2e-test", "1.0.0");
    hello.requested.stream_events = stream_events;
    send_line(write, &serde_json::to_string(&hello).unwrap()).await;
}

fn test_config() -> ServerConfig {
    ServerConfig {
        port: 0,
        ..ServerConfig::default()
    }
}

async fn spawn_server(
    config: ServerConfig,
    cmd_capacity: usize,
) -> (
    SocketAddr,
    mpsc::Receiver<InboundCommand>,
    mpsc::UnboundedSender<OutboundMessage>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(cmd_capacity);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    (addr, cmd_rx, out_tx)
}

/// Game loop stand-in: a real seeded session answering inbound commands.
async fn engine_task(
    mut cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
) {
    let mut session = Session::start_seeded(Collaborators::default(), Vec::<SessionEvent>::new(), 21);
    session.sink_mut().clear();
    let mut event_seq = 0u64;

    while let Some(inbound) = cmd_rx.recv().await {
        let reply = apply_inbound(&mut session, &inbound);
        for event in session.sink_mut().drain(..) {
            event_seq += 1;
            if let Some(line) = encode_event(event_seq, &event) {
                let _ = out_tx.send(OutboundMessage::Broadcast { line });
            }
        }
        if let Some(reply) = reply {
            let _ = out_tx.send(reply);
        }
    }
}

#[tokio::test]
async fn hello_welcome_snapshot_command_and_ack() {
    let (addr, cmd_rx, out_tx) = spawn_server(test_config(), 8).await;
    tokio::spawn(engine_task(cmd_rx, out_tx));

    let (mut lines, mut write) = connect(addr).await;
    hello(&mut write, 1, true).await;

    let welcome = read_json_line(&mut lines).await;
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(welcome["seq"], 1);
    assert_eq!(welcome["role"], "controller");
    assert_eq!(welcome["game_id"], "ball-sort");
    assert_eq!(welcome["protocol_version"], "1.0.0");

    let snapshot = read_json_line(&mut lines).await;
    assert_eq!(snapshot["type"], "event");
    assert_eq!(snapshot["event"]["name"], "stateChanged");
    assert_eq!(snapshot["event"]["level"], 1);
    assert_eq!(snapshot["event"]["status"], "playing");

    send_line(&mut write, r#"{"type":"command","seq":2,"ts":1,"action":"select","tube":0}"#).await;

    let event = read_json_line(&mut lines).await;
    assert_eq!(event["type"], "event");
    assert_eq!(event["event"]["name"], "stateChanged");
    assert_eq!(event["event"]["selected"], 0);

    let ack = read_json_line(&mut lines).await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["seq"], 2);
    assert_eq!(ack["status"], "ok");

    send_line(&mut write, r#"{"type":"command","seq":3,"ts":2,"action":"goToLevel","level":50}"#).await;
    let err = read_until(&mut lines, "error").await;
    assert_eq!(err["seq"], 3);
    assert_eq!(err["code"], "rejected");
}

#[tokio::test]
async fn command_before_hello_requires_handshake() {
    let (addr, _cmd_rx, _out_tx) = spawn_server(test_config(), 8).await;
    let (mut lines, mut write) = connect(addr).await;

    send_line(&mut write, r#"{"type":"command","seq":1,"ts":1,"action":"undo"}"#).await;
    let err = read_json_line(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "handshake_required");
}

#[tokio::test]
async fn protocol_mismatch_closes_connection() {
    let (addr, _cmd_rx, _out_tx) = spawn_server(test_config(), 8).await;
    let (mut lines, mut write) = connect(addr).await;

    let hello = create_hello(1, "old-client", "2.0.0");
    send_line(&mut write, &serde_json::to_string(&hello).unwrap()).await;

    let err = read_json_line(&mut lines).await;
    assert_eq!(err["code"], "protocol_mismatch");
    let eof = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .unwrap()
        .unwrap();
    assert!(eof.is_none());
}

#[tokio::test]
async fn malformed_lines_and_stale_seq_are_invalid() {
    let (addr, _cmd_rx, _out_tx) = spawn_server(test_config(), 8).await;
    let (mut lines, mut write) = connect(addr).await;
    hello(&mut write, 5, false).await;
    assert_eq!(read_json_line(&mut lines).await["type"], "welcome");

    send_line(&mut write, r#"{"type":"command","seq":6,"action":"#).await;
    let err = read_json_line(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 6);

    send_line(&mut write, r#"{"type":"command","seq":7,"ts":0,"action":"select"}"#).await;
    let err = read_json_line(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["message"], "select requires tube");

    send_line(&mut write, r#"{"type":"command","seq":4,"ts":0,"action":"undo"}"#).await;
    let err = read_json_line(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["message"], "seq must be strictly increasing");

    send_line(&mut write, r#"{"type":"ping","seq":20}"#).await;
    let err = read_json_line(&mut lines).await;
    assert_eq!(err["message"], "Unknown message type");
}

#[tokio::test]
async fn full_queue_reports_backpressure() {
    // Nobody drains the queue.
    let (addr, _cmd_rx, _out_tx) = spawn_server(test_config(), 1).await;
    let (mut lines, mut write) = connect(addr).await;
    hello(&mut write, 1, false).await;
    assert_eq!(read_json_line(&mut lines).await["type"], "welcome");

    send_line(&mut write, r#"{"type":"command","seq":2,"ts":0,"action":"pause"}"#).await;
    send_line(&mut write, r#"{"type":"command","seq":3,"ts":0,"action":"resume"}"#).await;

    let err = read_json_line(&mut lines).await;
    assert_eq!(err["code"], "backpressure");
    assert_eq!(err["seq"], 3);
}

#[tokio::test]
async fn full_queue_reports_missing_snapshot() {
    let (addr, _cmd_rx, _out_tx) = spawn_server(test_config(), 1).await;
    let (mut lines_a, mut write_a) = connect(addr).await;
    hello(&mut write_a, 1, false).await;
    assert_eq!(read_json_line(&mut lines_a).await["type"], "welcome");
    send_line(&mut write_a, r#"{"type":"command","seq":2,"ts":0,"action":"pause"}"#).await;

    // Let the pause land in the queue before the streaming client says hello.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let (mut lines_b, mut write_b) = connect(addr).await;
    hello(&mut write_b, 7, true).await;
    assert_eq!(read_json_line(&mut lines_b).await["type"], "welcome");
    let err = read_json_line(&mut lines_b).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "backpressure");
    assert_eq!(err["seq"], 7);
}

#[tokio::test]
async fn observer_cannot_command_or_claim() {
    let (addr, cmd_rx, out_tx) = spawn_server(test_config(), 8).await;
    tokio::spawn(engine_task(cmd_rx, out_tx));

    let (mut lines_a, mut write_a) = connect(addr).await;
    hello(&mut write_a, 1, false).await;
    assert_eq!(read_json_line(&mut lines_a).await["role"], "controller");

    let (mut lines_b, mut write_b) = connect(addr).await;
    hello(&mut write_b, 1, false).await;
    let welcome = read_json_line(&mut lines_b).await;
    assert_eq!(welcome["role"], "observer");
    assert_eq!(welcome["controller_id"], welcome["client_id"].as_u64().unwrap() - 1);

    send_line(&mut write_b, r#"{"type":"command","seq":2,"ts":0,"action":"hint"}"#).await;
    assert_eq!(read_json_line(&mut lines_b).await["code"], "not_controller");

    send_line(&mut write_b, r#"{"type":"control","seq":3,"ts":0,"action":"claim"}"#).await;
    assert_eq!(read_json_line(&mut lines_b).await["code"], "controller_active");

    send_line(&mut write_b, r#"{"type":"control","seq":4,"ts":0,"action":"release"}"#).await;
    assert_eq!(read_json_line(&mut lines_b).await["code"], "not_controller");

    // Once released, the observer can take over.
    send_line(&mut write_a, r#"{"type":"control","seq":2,"ts":0,"action":"release"}"#).await;
    assert_eq!(read_json_line(&mut lines_a).await["type"], "ack");

    send_line(&mut write_b, r#"{"type":"control","seq":5,"ts":0,"action":"CLAIM"}"#).await;
    assert_eq!(read_json_line(&mut lines_b).await["type"], "ack");

    send_line(&mut write_b, r#"{"type":"command","seq":6,"ts":0,"action":"hint"}"#).await;
    let ack = read_json_line(&mut lines_b).await;
    assert_eq!(ack["type"], "ack");
    assert!(ack["hint"]["to"].is_u64());
}

#[tokio::test]
async fn controller_disconnect_promotes_next_client() {
    let (addr, cmd_rx, out_tx) = spawn_server(test_config(), 8).await;
    tokio::spawn(engine_task(cmd_rx, out_tx));

    let (mut lines_a, mut write_a) = connect(addr).await;
    hello(&mut write_a, 1, false).await;
    assert_eq!(read_json_line(&mut lines_a).await["role"], "controller");

    let (mut lines_b, mut write_b) = connect(addr).await;
    hello(&mut write_b, 1, false).await;
    assert_eq!(read_json_line(&mut lines_b).await["role"], "observer");

    drop(write_a);
    drop(lines_a);

    // Promotion happens asynchronously after the disconnect is noticed.
    let mut seq = 2;
    let ack = loop {
        let line = format!(r#"{{"type":"command","seq":{seq},"ts":0,"action":"pause"}}"#);
        send_line(&mut write_b, &line).await;
        let v = read_json_line(&mut lines_b).await;
        if v["type"] == "ack" || seq > 50 {
            break v;
        }
        assert_eq!(v["code"], "not_controller");
        seq += 1;
        tokio::time::sleep(Duration::from_millis(20)).await;
    };
    assert_eq!(ack["type"], "ack");
}
