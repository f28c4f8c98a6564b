//! WebSocket connection handlers.
//!
//! Each upgraded connection gets two tasks: a reader that dispatches inbound
//! frames by event name, and a writer (`pusher_loop`) that drains the
//! connection's outbound channel into the socket. When either finishes the
//! other is aborted and the connection is deregistered.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{InboundFrame, SEND_MESSAGE_EVENT, SendMessagePayload},
    ui::state::AppState,
    usecase::Connected,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();

    // Create a channel for this connection to receive broadcasts
    let (tx, rx) = mpsc::unbounded_channel();

    // Register before the writer starts; the initial user-count waits in rx
    let Connected { id, user_count } = state.connect_client_usecase.execute(tx).await;
    tracing::info!("Connection '{}' open. Total users: {}", id, user_count);

    let mut send_task = pusher_loop(rx, sender, id);
    let mut recv_task = reader_loop(receiver, state.clone(), id);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        result = &mut recv_task => {
            send_task.abort();
            log_task_end("reader", &id, result);
        }
        result = &mut send_task => {
            recv_task.abort();
            log_task_end("writer", &id, result);
        }
    };

    match state.disconnect_client_usecase.execute(&id).await {
        Some(user_count) => tracing::info!(
            "Connection '{}' closed. Total users: {}",
            id,
            user_count
        ),
        None => tracing::debug!("Connection '{}' was already removed", id),
    }
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// Ends when the socket write fails or when the registry drops the channel.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    id: ConnectionId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(frame.into())).await {
                tracing::warn!("Failed to write to connection '{}': {}", id, e);
                break;
            }
        }
    })
}

/// Spawns a task that reads frames from the client in receipt order and dispatches them.
///
/// Ends on a close frame, a read error, end of stream, or the idle timeout.
fn reader_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    id: ConnectionId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let next = match state.idle_timeout {
                Some(limit) => match tokio::time::timeout(limit, receiver.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        tracing::info!(
                            "Connection '{}' idle for {:?}, closing",
                            id,
                            limit
                        );
                        break;
                    }
                },
                None => receiver.next().await,
            };

            let msg = match next {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on connection '{}': {}", id, e);
                    break;
                }
                None => break,
            };

            match msg {
                Message::Text(text) => dispatch(&state, &id, text.as_str()).await,
                Message::Binary(data) => {
                    tracing::debug!(
                        "Ignoring {} byte binary frame from connection '{}'",
                        data.len(),
                        id
                    );
                }
                Message::Ping(_) | Message::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", id);
                    break;
                }
            }
        }
    })
}

/// Per-connection dispatch table: event name → handler.
async fn dispatch(state: &AppState, id: &ConnectionId, text: &str) {
    let frame = match serde_json::from_str::<InboundFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Ignoring malformed frame from connection '{}': {}", id, e);
            return;
        }
    };

    match frame.event.as_str() {
        SEND_MESSAGE_EVENT => on_send_message(state, id, frame.data).await,
        other => tracing::warn!("Ignoring unknown event '{}' from connection '{}'", other, id),
    }
}

async fn on_send_message(state: &AppState, id: &ConnectionId, data: serde_json::Value) {
    let payload = match serde_json::from_value::<SendMessagePayload>(data) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(
                "Dropped malformed '{}' payload from connection '{}': {}",
                SEND_MESSAGE_EVENT,
                id,
                e
            );
            return;
        }
    };

    if let Err(e) = state
        .relay_message_usecase
        .execute(id, payload.sender, payload.message)
        .await
    {
        tracing::warn!("Dropped message from connection '{}': {}", id, e);
    }
}

fn log_task_end(task: &str, id: &ConnectionId, result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => tracing::debug!("Connection '{}' {} task finished", id, task),
        Err(e) if e.is_panic() => {
            tracing::error!("Connection '{}' {} task panicked: {}", id, task, e)
        }
        Err(e) => tracing::debug!("Connection '{}' {} task cancelled: {}", id, task, e),
    }
}
