//! Domain error types.

use thiserror::Error;

/// Errors raised while constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Sender must not be empty")]
    EmptySender,

    #[error("Message must not be empty")]
    EmptyMessage,
}
