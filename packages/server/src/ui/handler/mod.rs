//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{fallback, handle_panic, health_check};
pub use websocket::websocket_handler;
