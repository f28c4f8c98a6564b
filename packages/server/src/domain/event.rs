//! Events pushed from the server to connected clients.

use super::{entity::ChatMessage, value_object::UserCount};

/// Server-to-client event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// The number of open connections changed
    UserCount(UserCount),
    /// A chat message was relayed
    NewMessage(ChatMessage),
}

impl ServerEvent {
    /// Wire-level event name
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::UserCount(_) => "user-count",
            ServerEvent::NewMessage(_) => "new-message",
        }
    }
}
