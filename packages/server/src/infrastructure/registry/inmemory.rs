//! In-memory `ConnectionRegistry`.
//!
//! ## 責務
//!
//! - 接続ごとの `PusherChannel` を管理
//! - 接続数の変化を全クライアントに通知（user-count）
//! - イベントの直列化とブロードキャスト
//!
//! ## 設計ノート
//!
//! The whole map sits behind one `Mutex`. Every operation keeps the lock for
//! its mutation and the fan-out that follows it, so two count updates can
//! never interleave their broadcasts. Fan-out only enqueues on unbounded
//! channels; socket writes happen on each connection's writer task.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        BroadcastReport, ConnectionId, ConnectionRegistry, PusherChannel, ServerEvent, UserCount,
    },
    infrastructure::dto::websocket::ServerEventDto,
};

type Connections = HashMap<ConnectionId, PusherChannel>;

/// `ConnectionRegistry` backed by a `HashMap` guarded by a `tokio::sync::Mutex`.
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    connections: Mutex<Connections>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, id: ConnectionId, channel: PusherChannel) -> UserCount {
        let mut connections = self.connections.lock().await;
        connections.insert(id, channel);
        tracing::info!(
            "Connection '{}' registered. Total: {}",
            id,
            connections.len()
        );

        broadcast_user_count(&mut connections);
        UserCount::new(connections.len())
    }

    async fn deregister(&self, id: &ConnectionId) -> Option<UserCount> {
        let mut connections = self.connections.lock().await;
        if connections.remove(id).is_none() {
            tracing::debug!("Connection '{}' is not registered, nothing to remove", id);
            return None;
        }
        tracing::info!(
            "Connection '{}' deregistered. Total: {}",
            id,
            connections.len()
        );

        broadcast_user_count(&mut connections);
        Some(UserCount::new(connections.len()))
    }

    async fn broadcast(&self, event: ServerEvent) -> BroadcastReport {
        let mut connections = self.connections.lock().await;
        let event_name = event.name();

        let mut report = deliver(&mut connections, event);
        if !report.dropped.is_empty() {
            let more = broadcast_user_count(&mut connections);
            report.dropped.extend(more);
        }

        tracing::debug!(
            "Broadcasted '{}' to {} connection(s), dropped {}",
            event_name,
            report.delivered,
            report.dropped.len()
        );
        report
    }

    async fn user_count(&self) -> UserCount {
        UserCount::new(self.connections.lock().await.len())
    }
}

/// Broadcast the current count until no further connection drops out.
///
/// Returns every connection removed along the way.
fn broadcast_user_count(connections: &mut Connections) -> Vec<ConnectionId> {
    let mut dropped = Vec::new();
    loop {
        let count = UserCount::new(connections.len());
        let report = deliver(connections, ServerEvent::UserCount(count));
        if report.dropped.is_empty() {
            return dropped;
        }
        dropped.extend(report.dropped);
    }
}

/// Serialize once and hand the frame to every connection.
///
/// Connections whose receiver has gone away are removed from the map.
fn deliver(connections: &mut Connections, event: ServerEvent) -> BroadcastReport {
    let event_name = event.name();
    let payload = match serde_json::to_string(&ServerEventDto::from(event)) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to serialize '{}' event: {}", event_name, e);
            return BroadcastReport::default();
        }
    };

    let mut report = BroadcastReport::default();
    for (id, channel) in connections.iter() {
        // ブロードキャストでは一部の送信失敗を許容
        if channel.send(payload.clone()).is_err() {
            tracing::warn!(
                "Failed to push '{}' to connection '{}', removing it",
                event_name,
                id
            );
            report.dropped.push(*id);
        } else {
            report.delivered += 1;
        }
    }

    for id in &report.dropped {
        connections.remove(id);
    }
    report
}
