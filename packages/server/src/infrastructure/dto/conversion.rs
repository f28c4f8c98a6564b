//! Conversion logic between DTOs and domain types.

use crate::domain::{ChatMessage, ServerEvent};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain → DTO
// ========================================

impl From<ChatMessage> for dto::NewMessagePayload {
    fn from(model: ChatMessage) -> Self {
        Self {
            timestamp: model.timestamp.to_iso8601(),
            message: model.body.into_string(),
            sender: model.sender.into_string(),
        }
    }
}

impl From<ServerEvent> for dto::ServerEventDto {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::UserCount(count) => Self::UserCount(count.value()),
            ServerEvent::NewMessage(message) => Self::NewMessage(message.into()),
        }
    }
}
