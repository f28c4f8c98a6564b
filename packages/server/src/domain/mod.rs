//! Domain layer for the relay.
//!
//! Business types that are independent of the wire format and of the
//! transport that carries them.

pub mod entity;
pub mod error;
pub mod event;
pub mod registry;
pub mod value_object;

pub use entity::ChatMessage;
pub use error::ValueObjectError;
pub use event::ServerEvent;
pub use registry::{BroadcastReport, ConnectionRegistry, PusherChannel};
pub use value_object::{ConnectionId, MessageBody, SenderName, Timestamp, UserCount};

#[cfg(test)]
pub use registry::MockConnectionRegistry;
