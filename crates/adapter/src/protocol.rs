//! Protocol module - JSON message types for the controller adapter
//!
//! Line-delimited JSON. Every message has: type, seq (sequence number), ts (timestamp in ms)

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::engine::{SessionEvent, SessionSnapshot};
use crate::types::{GameAction, Hint};

/// Protocol version announced in `welcome`. Clients must speak `1.x`.
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    #[default]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    #[default]
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlType {
    #[serde(rename = "control")]
    #[default]
    Control,
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    /// Receive `event` messages for every session event.
    #[serde(default)]
    pub stream_events: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedRole {
    #[serde(rename = "controller")]
    Controller,
    #[serde(rename = "observer")]
    Observer,
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub action: ActionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tube: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u32>,
}

impl CommandMessage {
    /// Resolve into a session action, checking the action's required field.
    pub fn to_action(&self) -> Result<GameAction, String> {
        let action = match self.action {
            ActionName::Select => GameAction::Select {
                tube: self.tube.ok_or("select requires tube")?,
            },
            ActionName::Undo => GameAction::Undo,
            ActionName::Hint => GameAction::Hint,
            ActionName::Pause => GameAction::Pause,
            ActionName::Resume => GameAction::Resume,
            ActionName::Restart => GameAction::Restart,
            ActionName::NextLevel => GameAction::NextLevel,
            ActionName::GoToLevel => GameAction::GoToLevel {
                level: self.level.ok_or("goToLevel requires level")?,
            },
            ActionName::AddTime => GameAction::AddTime {
                seconds: self.seconds.ok_or("addTime requires seconds")?,
            },
        };
        Ok(action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    Select,
    Undo,
    Hint,
    Pause,
    Resume,
    Restart,
    NextLevel,
    GoToLevel,
    AddTime,
}

impl ActionName {
    pub const ALL: [ActionName; 9] = [
        ActionName::Select,
        ActionName::Undo,
        ActionName::Hint,
        ActionName::Pause,
        ActionName::Resume,
        ActionName::Restart,
        ActionName::NextLevel,
        ActionName::GoToLevel,
        ActionName::AddTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::Select => "select",
            ActionName::Undo => "undo",
            ActionName::Hint => "hint",
            ActionName::Pause => "pause",
            ActionName::Resume => "resume",
            ActionName::Restart => "restart",
            ActionName::NextLevel => "nextLevel",
            ActionName::GoToLevel => "goToLevel",
            ActionName::AddTime => "addTime",
        }
    }

    /// Case-insensitive lookup.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
    }
}

impl<'de> Deserialize<'de> for ActionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        ActionName::parse(s).ok_or_else(|| serde::de::Error::custom("unknown action"))
    }
}

impl Serialize for ActionName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Control message (claim/release controller status)
#[derive(Debug, Clone, Deserialize)]
pub struct ControlMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ControlType,
    pub seq: u64,
    pub ts: u64,
    pub action: ControlAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Claim,
    Release,
}

impl<'de> Deserialize<'de> for ControlAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("claim") {
            Ok(Self::Claim)
        } else if s.eq_ignore_ascii_case("release") {
            Ok(Self::Release)
        } else {
            Err(serde::de::Error::custom("invalid control action"))
        }
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "event")]
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    ControllerActive,
    InvalidCommand,
    /// The session refused the action (illegal move, locked level, ...).
    Rejected,
    Backpressure,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: usize,
    pub role: AssignedRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<usize>,
    pub game_id: String,
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub actions: Vec<ActionName>,
    pub events: Vec<String>,
}

/// Acknowledgment for an applied command or control request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<HintPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintPayload {
    pub from: usize,
    pub to: usize,
}

impl From<Hint> for HintPayload {
    fn from(value: Hint) -> Self {
        Self {
            from: value.from,
            to: value.to,
        }
    }
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Session event pushed to streaming clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub msg_type: EventType,
    pub seq: u64,
    pub ts: u64,
    pub event: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum EventPayload {
    StateChanged(StatePayload),
    MoveCompleted {
        from: usize,
        to: usize,
        moved: usize,
    },
    MoveRejected {
        from: usize,
        to: usize,
        reason: String,
    },
    LevelCompleted {
        level: u32,
        moves: u32,
        time_remaining: u32,
        stars: u8,
    },
    TimeUpdated {
        time_remaining: u32,
        time_limit: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePayload {
    pub level: u32,
    pub max_level_reached: u32,
    pub status: String,
    pub moves: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<usize>,
    pub hints_used: u32,
    pub hints_remaining: u32,
    pub time_remaining: u32,
    pub time_limit: u32,
    pub epoch: u64,
    pub capacity: usize,
    pub tubes: Vec<Vec<BallPayload>>,
    pub can_undo: bool,
    pub state_hash: StateHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallPayload {
    pub color: u8,
    pub expression: String,
}

impl From<&SessionSnapshot> for StatePayload {
    fn from(s: &SessionSnapshot) -> Self {
        Self {
            level: s.level,
            max_level_reached: s.max_level_reached,
            status: s.status.as_str().to_string(),
            moves: s.moves,
            selected: s.selected,
            hints_used: s.hints_used,
            hints_remaining: s.hints_remaining,
            time_remaining: s.time_remaining,
            time_limit: s.time_limit,
            epoch: s.epoch,
            capacity: s.capacity,
            tubes: s
                .tubes
                .iter()
                .map(|tube| {
                    tube.iter()
                        .map(|p| BallPayload {
                            color: p.color_index,
                            expression: p.expression.as_str().to_string(),
                        })
                        .collect()
                })
                .collect(),
            can_undo: s.can_undo,
            state_hash: state_hash(s),
        }
    }
}

impl From<&SessionEvent> for EventPayload {
    fn from(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::StateChanged(snapshot) => EventPayload::StateChanged(snapshot.into()),
            SessionEvent::MoveCompleted { from, to, moved } => EventPayload::MoveCompleted {
                from: *from,
                to: *to,
                moved: *moved,
            },
            SessionEvent::MoveRejected { from, to, reason } => EventPayload::MoveRejected {
                from: *from,
                to: *to,
                reason: reason.as_str().to_string(),
            },
            SessionEvent::LevelCompleted {
                level,
                moves,
                time_remaining,
                stars,
            } => EventPayload::LevelCompleted {
                level: *level,
                moves: *moves,
                time_remaining: *time_remaining,
                stars: *stars,
            },
            SessionEvent::TimeUpdated {
                time_remaining,
                time_limit,
            } => EventPayload::TimeUpdated {
                time_remaining: *time_remaining,
                time_limit: *time_limit,
            },
        }
    }
}

/// Stable 64-bit FNV-1a hasher for `state_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Hash of the rule-relevant state: board colors, level, counters and timer epoch.
pub fn state_hash(s: &SessionSnapshot) -> StateHash {
    let mut hasher = Fnv1aHasher::new();
    s.level.hash(&mut hasher);
    s.status.as_str().hash(&mut hasher);
    s.moves.hash(&mut hasher);
    s.selected.hash(&mut hasher);
    s.hints_used.hash(&mut hasher);
    s.time_remaining.hash(&mut hasher);
    s.epoch.hash(&mut hasher);
    s.capacity.hash(&mut hasher);
    for tube in &s.tubes {
        tube.len().hash(&mut hasher);
        for piece in tube {
            piece.color_index.hash(&mut hasher);
        }
    }
    StateHash(hasher.finish())
}

/// Deterministic state hash serialized as 16 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "control")]
        Control(ControlMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Control(m)) => Ok(ParsedMessage::Control(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeAndSeq<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
                seq: Option<u64>,
            }
            let head = serde_json::from_str::<TypeAndSeq>(json)?;
            let msg_type = head.msg_type.unwrap_or("unknown");
            if !matches!(msg_type, "hello" | "command" | "control") {
                return Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: head.seq.unwrap_or(0),
                }));
            }
            Err(e)
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Control(ControlMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        requested: RequestedCapabilities {
            stream_events: true,
        },
    }
}

/// Create a welcome message
pub fn create_welcome(
    seq: u64,
    protocol_version: &str,
    client_id: usize,
    role: AssignedRole,
    controller_id: Option<usize>,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
        role,
        controller_id,
        game_id: "ball-sort".to_string(),
        capabilities: ServerCapabilities {
            actions: ActionName::ALL.to_vec(),
            events: [
                "stateChanged",
                "moveCompleted",
                "moveRejected",
                "levelCompleted",
                "timeUpdated",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        },
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64, hint: Option<Hint>) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
        hint: hint.map(HintPayload::from),
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Wrap a session event for the wire
pub fn create_event(seq: u64, event: &SessionEvent) -> EventMessage {
    EventMessage {
        msg_type: EventType::Event,
        seq,
        ts: current_timestamp_ms(),
        event: EventPayload::from(event),
    }
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Expression, MoveRejection, Piece, SessionStatus};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            level: 3,
            max_level_reached: 4,
            status: SessionStatus::Playing,
            moves: 2,
            selected: Some(1),
            hints_used: 0,
            hints_remaining: 3,
            time_remaining: 50,
            time_limit: 60,
            epoch: 1,
            capacity: 6,
            tubes: vec![
                vec![Piece::new(0, Expression::Crying), Piece::new(1, Expression::Angry)],
                vec![],
            ],
            can_undo: true,
        }
    }

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":1234567890,"client":{"name":"bot","version":"1.0.0"},"protocol_version":"1.0.0","formats":["json"],"requested":{"stream_events":true}}"#;

        let result = parse_message(json).unwrap();
        match result {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.msg_type, HelloType::Hello);
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "bot");
                assert_eq!(msg.protocol_version, "1.0.0");
                assert!(msg.requested.stream_events);
            }
            _ => panic!("Expected Hello message"),
        }
    }

    #[test]
    fn test_parse_hello_defaults() {
        let json = r#"{"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"0"},"protocol_version":"1.2"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert!(!msg.requested.stream_events);
            }
            _ => panic!("Expected Hello message"),
        }
    }

    #[test]
    fn test_parse_command_select() {
        let json = r#"{"type":"command","seq":2,"ts":1234567900,"action":"select","tube":3}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.action, ActionName::Select);
                assert_eq!(msg.to_action(), Ok(GameAction::Select { tube: 3 }));
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_action_names_case_insensitive() {
        assert_eq!(ActionName::parse("NEXTLEVEL"), Some(ActionName::NextLevel));
        assert_eq!(ActionName::parse("gotolevel"), Some(ActionName::GoToLevel));
        assert_eq!(ActionName::parse("hardDrop"), None);
    }

    #[test]
    fn test_command_missing_field() {
        let json = r#"{"type":"command","seq":2,"ts":0,"action":"goToLevel"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.to_action(), Err("goToLevel requires level".to_string()));
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_parse_unknown_action_is_error() {
        let json = r#"{"type":"command","seq":2,"ts":0,"action":"rotate"}"#;
        assert!(parse_message(json).is_err());
    }

    #[test]
    fn test_parse_control() {
        let json = r#"{"type":"control","seq":3,"ts":1234567910,"action":"claim"}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Control(msg) => assert_eq!(msg.action, ControlAction::Claim),
            _ => panic!("Expected Control message"),
        }
    }

    #[test]
    fn test_parse_unknown_type() {
        let json = r#"{"type":"ping","seq":9}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Unknown(m) => assert_eq!(m.seq, 9),
            _ => panic!("Expected Unknown message"),
        }
    }

    #[test]
    fn test_create_welcome() {
        let welcome = create_welcome(1, PROTOCOL_VERSION, 7, AssignedRole::Controller, Some(7));
        assert_eq!(welcome.msg_type, WelcomeType::Welcome);
        assert_eq!(welcome.client_id, 7);
        assert_eq!(welcome.role, AssignedRole::Controller);
        assert_eq!(welcome.game_id, "ball-sort");
        assert_eq!(welcome.capabilities.actions.len(), 9);

        let v = serde_json::to_value(&welcome).unwrap();
        assert_eq!(v["type"], "welcome");
        assert_eq!(v["capabilities"]["actions"][5], "restart");
    }

    #[test]
    fn test_error_code_wire_names() {
        let error = create_error(5, ErrorCode::NotController, "Only controller may send commands");
        let v = serde_json::to_value(&error).unwrap();
        assert_eq!(v["code"], "not_controller");
        let v = serde_json::to_value(create_error(1, ErrorCode::Rejected, "x")).unwrap();
        assert_eq!(v["code"], "rejected");
    }

    #[test]
    fn test_ack_with_hint() {
        let ack = create_ack(10, Some(Hint { from: 1, to: 4 }));
        let v = serde_json::to_value(&ack).unwrap();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["hint"]["from"], 1);
        assert_eq!(v["hint"]["to"], 4);

        let v = serde_json::to_value(create_ack(11, None)).unwrap();
        assert!(v.get("hint").is_none());
    }

    #[test]
    fn test_state_event_wire_shape() {
        let event = SessionEvent::StateChanged(snapshot());
        let v = serde_json::to_value(create_event(4, &event)).unwrap();
        assert_eq!(v["type"], "event");
        assert_eq!(v["event"]["name"], "stateChanged");
        assert_eq!(v["event"]["status"], "playing");
        assert_eq!(v["event"]["tubes"][0][1]["color"], 1);
        assert_eq!(v["event"]["tubes"][0][0]["expression"], "crying");
        assert_eq!(v["event"]["state_hash"].as_str().unwrap().len(), 16);
    }

    #[test]
    fn test_rejected_event_reason() {
        let event = SessionEvent::MoveRejected {
            from: 0,
            to: 2,
            reason: MoveRejection::ColorMismatch,
        };
        let v = serde_json::to_value(create_event(1, &event)).unwrap();
        assert_eq!(v["event"]["name"], "moveRejected");
        assert_eq!(v["event"]["reason"], "color_mismatch");
    }

    #[test]
    fn test_state_hash_tracks_board() {
        let a = snapshot();
        let mut b = snapshot();
        assert_eq!(state_hash(&a), state_hash(&b));
        b.tubes[1].push(Piece::new(2, Expression::Angry));
        assert_ne!(state_hash(&a), state_hash(&b));

        // Expressions are cosmetic and do not affect the hash.
        let mut c = snapshot();
        c.tubes[0][0].expression = Expression::Sleeping;
        assert_eq!(state_hash(&a), state_hash(&c));
    }

    #[test]
    fn test_state_hash_hex_roundtrip() {
        let h = StateHash(0x00ab_cdef_0123_4567);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, "\"00abcdef01234567\"");
        assert_eq!(serde_json::from_str::<StateHash>(&json).unwrap(), h);
    }
}
