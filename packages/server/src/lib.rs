//! Broadcast relay server for classroom chat.
//!
//! Clients open a WebSocket on `/ws`, receive `user-count` whenever the number
//! of connections changes, and send `send-message` events that are stamped
//! with the server clock and broadcast to everyone as `new-message`.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
