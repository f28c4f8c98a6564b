//! Server state shared by all handlers.

use std::{sync::Arc, time::Duration};

use tokio::time::Instant;

use crate::usecase::{ConnectClientUseCase, DisconnectClientUseCase, RelayMessageUseCase};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// RelayMessageUseCase（メッセージ中継のユースケース）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    /// When the server started, for `/health` uptime
    pub started_at: Instant,
    /// Close connections that stay silent this long
    pub idle_timeout: Option<Duration>,
}
