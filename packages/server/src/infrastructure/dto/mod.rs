//! Data Transfer Objects (DTOs) for the relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: channel event envelopes and payloads
//! - `http`: HTTP response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
