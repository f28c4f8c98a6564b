//! UseCase error types.

use thiserror::Error;

/// Reasons an inbound chat message is dropped instead of relayed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Sender is missing or empty")]
    InvalidSender,

    #[error("Message is missing or empty")]
    InvalidMessage,

    #[error("Sender is too long ({actual} > {max} characters)")]
    SenderTooLong { max: usize, actual: usize },

    #[error("Message is too long ({actual} > {max} characters)")]
    MessageTooLong { max: usize, actual: usize },
}
