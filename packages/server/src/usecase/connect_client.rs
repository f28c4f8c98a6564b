//! UseCase: クライアント接続処理

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, PusherChannel, UserCount};

/// Result of a successful connect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connected {
    pub id: ConnectionId,
    pub user_count: UserCount,
}

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl ConnectClientUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Assign an id to a freshly opened connection and register it.
    ///
    /// The registry broadcasts the new count, so `sender` receives a
    /// `user-count` frame before this returns.
    pub async fn execute(&self, sender: PusherChannel) -> Connected {
        let id = ConnectionId::generate();
        let user_count = self.registry.register(id, sender).await;
        Connected { id, user_count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::registry::InMemoryConnectionRegistry;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_assigns_distinct_ids_and_counts() {
        // テスト項目: 接続ごとに異なる ID が割り当てられ、接続数が増える
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ConnectClientUseCase::new(registry.clone());
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        let first = usecase.execute(tx1).await;
        let second = usecase.execute(tx2).await;

        // then (期待する結果):
        assert_ne!(first.id, second.id);
        assert_eq!(first.user_count, UserCount::new(1));
        assert_eq!(second.user_count, UserCount::new(2));
        assert_eq!(registry.user_count().await, UserCount::new(2));
    }

    #[tokio::test]
    async fn test_connect_pushes_user_count_to_new_client() {
        // テスト項目: 新しいクライアント自身にも接続数が通知される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = ConnectClientUseCase::new(registry);
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(tx).await;

        // then (期待する結果):
        let frame = rx.try_recv().unwrap();
        assert_eq!(frame, r#"{"event":"user-count","data":1}"#);
    }
}
