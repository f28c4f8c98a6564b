//! Transport layer: HTTP responder and WebSocket channel on one port.

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ServerError;
pub use server::Server;
