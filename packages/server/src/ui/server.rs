//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, time::Instant};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::usecase::{ConnectClientUseCase, DisconnectClientUseCase, RelayMessageUseCase};

use super::{
    error::ServerError,
    handler::{fallback, handle_panic, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Broadcast relay server
///
/// Serves the HTTP responder and the WebSocket channel on one listener.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_client_usecase,
///     disconnect_client_usecase,
///     relay_message_usecase,
///     config.idle_timeout,
/// );
/// server.run(&config.bind_addr()).await?;
/// ```
pub struct Server {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// RelayMessageUseCase（メッセージ中継のユースケース）
    relay_message_usecase: Arc<RelayMessageUseCase>,
    idle_timeout: Option<Duration>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_client_usecase` - UseCase for accepting connections
    /// * `disconnect_client_usecase` - UseCase for closing connections
    /// * `relay_message_usecase` - UseCase for relaying chat messages
    /// * `idle_timeout` - Close connections silent for this long (`None` disables it)
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        relay_message_usecase: Arc<RelayMessageUseCase>,
        idle_timeout: Option<Duration>,
    ) -> Self {
        Self {
            connect_client_usecase,
            disconnect_client_usecase,
            relay_message_usecase,
            idle_timeout,
        }
    }

    /// Build the router. Uptime is measured from this call.
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            relay_message_usecase: self.relay_message_usecase,
            started_at: Instant::now(),
            idle_timeout: self.idle_timeout,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .fallback(fallback)
            .with_state(app_state)
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind to `bind_addr` and serve until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, bind_addr: &str) -> Result<(), ServerError> {
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.to_string(),
                source,
            })?;

        tracing::info!(
            "Relay server listening on {}",
            listener.local_addr().map_err(ServerError::LocalAddr)?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until a shutdown signal arrives.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Serve)
    }
}
