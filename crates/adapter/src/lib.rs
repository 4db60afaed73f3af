//! Adapter module - remote control via TCP socket with JSON protocol
//!
//! External agents drive a ball-sort session through a line-delimited JSON
//! protocol over TCP. The crate also carries the host-side collaborators a
//! headless run needs: a JSON file progress store and log-only reporters.
//!
//! # Protocol Overview
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Event Streaming**: Clients that asked for `stream_events` receive every session event
//! 5. **Commanding**: Controller sends one `command` per game action
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: One action (`select`, `undo`, `hint`, `pause`, `resume`, `restart`,
//!   `nextLevel`, `goToLevel`, `addTime`) with its argument
//! - **control**: Claim or release controller status
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with role and server capabilities
//! - **event**: `stateChanged`, `moveCompleted`, `moveRejected`, `levelCompleted`, `timeUpdated`
//! - **ack**: Command applied; carries the suggested move for `hint`
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `BALL_SORT_HOST`: Bind address (default: "127.0.0.1")
//! - `BALL_SORT_PORT`: Port number (default: 7878)
//! - `BALL_SORT_MAX_PENDING`: Command queue depth before `backpressure` (default: 16)
//! - `BALL_SORT_ADAPTER_DISABLED`: Set to "1" or "true" to run without the adapter
//! - `BALL_SORT_PROGRESS_PATH`: Progress file (default: `ball-sort-progress.json`)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"0.1.0"},"protocol_version":"1.0.0","requested":{"stream_events":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"event","seq":1,"ts":...,"event":{"name":"stateChanged","level":1,...}}
//! Client -> Server: {"type":"command","seq":2,"ts":0,"action":"select","tube":0}
//! Server -> Client: {"type":"event","seq":2,"ts":...,"event":{"name":"stateChanged",...,"selected":0}}
//! Server -> Client: {"type":"ack","seq":2,"ts":...,"status":"ok"}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0","requested":{"stream_events":true}}
//! ```

pub mod protocol;
pub mod reporter;
pub mod runtime;
pub mod server;
pub mod store;

pub use ball_sort_core as core;
pub use ball_sort_engine as engine;
pub use ball_sort_types as types;

pub use protocol::*;
pub use reporter::{TracingCues, TracingReporter};
pub use runtime::{
    apply_inbound, encode_event, Adapter, InboundCommand, InboundPayload, OutboundMessage,
};
pub use server::*;
pub use store::{JsonFileProgressStore, DEFAULT_PROGRESS_PATH};
