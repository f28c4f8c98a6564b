//! UseCase layer: the operations the transport drives.

pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod relay_message;

pub use connect_client::{ConnectClientUseCase, Connected};
pub use disconnect_client::DisconnectClientUseCase;
pub use error::RelayError;
pub use relay_message::RelayMessageUseCase;
