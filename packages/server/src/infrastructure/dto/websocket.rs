//! WebSocket event DTOs.
//!
//! Every event travels as one text frame holding a JSON envelope:
//!
//! ```json
//! {"event": "new-message", "data": {"message": "hi", "sender": "alice", "timestamp": "2024-05-01T12:00:00.000Z"}}
//! ```

use serde::{Deserialize, Serialize};

/// Event name of the only client-to-server event
pub const SEND_MESSAGE_EVENT: &str = "send-message";

/// Server-to-client envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEventDto {
    /// `{"event":"user-count","data":2}`
    UserCount(usize),
    /// `{"event":"new-message","data":{...}}`
    NewMessage(NewMessagePayload),
}

/// Payload of `new-message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessagePayload {
    pub message: String,
    pub sender: String,
    /// ISO-8601 UTC, assigned by the server
    pub timestamp: String,
}

/// Client-to-server envelope, before dispatch on `event`.
///
/// `data` stays untyped until the handler for `event` is chosen so that
/// unknown events can be skipped without failing the whole frame.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload of `send-message`.
///
/// Both fields are optional on the wire; presence and emptiness are checked by
/// the relay, not by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    pub message: Option<String>,
    pub sender: Option<String>,
}
