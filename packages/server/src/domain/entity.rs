//! Domain entities.

use super::value_object::{MessageBody, SenderName, Timestamp};

/// One chat message as relayed by the server.
///
/// Built per inbound `send-message` event and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: SenderName,
    pub body: MessageBody,
    /// Assigned by the server when the message is relayed
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(sender: SenderName, body: MessageBody, timestamp: Timestamp) -> Self {
        Self {
            sender,
            body,
            timestamp,
        }
    }
}
