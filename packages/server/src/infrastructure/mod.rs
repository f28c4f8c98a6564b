//! Infrastructure layer: wire formats and the concrete connection registry.

pub mod dto;
pub mod registry;
