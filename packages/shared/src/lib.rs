//! Utilities shared across Hiroba packages.

pub mod logger;
pub mod time;
