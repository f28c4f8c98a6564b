//! ConnectionRegistry trait 定義
//!
//! 接続中のクライアント集合と、その集合へのブロードキャストのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, ServerEvent, UserCount};

/// Outbound channel of one connection.
///
/// The UI layer owns the receiving end and forwards each serialized frame to
/// the socket.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Outcome of one fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the event was handed to
    pub delivered: usize,
    /// Connections whose outbound channel was gone; they have been removed
    pub dropped: Vec<ConnectionId>,
}

/// Registry of open connections.
///
/// The registry is the only owner of the connection set. The user count is
/// always the size of that set, and every mutation is followed by a
/// `user-count` broadcast before the next mutation may start.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add a connection and broadcast the new count to everyone, the new
    /// connection included.
    async fn register(&self, id: ConnectionId, channel: PusherChannel) -> UserCount;

    /// Remove a connection and broadcast the new count.
    ///
    /// Returns `None` without broadcasting when `id` is not registered.
    async fn deregister(&self, id: &ConnectionId) -> Option<UserCount>;

    /// Send `event` to every registered connection.
    ///
    /// Delivery failures are logged and the failing connections removed; they
    /// are never reported as errors.
    async fn broadcast(&self, event: ServerEvent) -> BroadcastReport;

    /// Current number of registered connections
    async fn user_count(&self) -> UserCount;
}
