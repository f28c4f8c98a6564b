//! UseCase: クライアント切断処理

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, UserCount};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectClientUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Remove a connection. Safe to call more than once for the same id.
    ///
    /// # Returns
    ///
    /// * `Some(UserCount)` - the connection was removed; remaining clients got the new count
    /// * `None` - the connection was already gone
    pub async fn execute(&self, id: &ConnectionId) -> Option<UserCount> {
        self.registry.deregister(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::registry::InMemoryConnectionRegistry;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_disconnect_registered_client() {
        // テスト項目: 登録済みクライアントの切断で接続数が減る
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = DisconnectClientUseCase::new(registry.clone());
        let id = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry.register(id, tx).await;

        // when (操作):
        let result = usecase.execute(&id).await;

        // then (期待する結果):
        assert_eq!(result, Some(UserCount::new(0)));
        assert_eq!(registry.user_count().await, UserCount::new(0));
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        // テスト項目: 同じクライアントを二度切断しても接続数が壊れない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = DisconnectClientUseCase::new(registry.clone());
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        registry.register(a, tx_a).await;
        registry.register(b, tx_b).await;

        // when (操作):
        let first = usecase.execute(&a).await;
        let second = usecase.execute(&a).await;

        // then (期待する結果):
        assert_eq!(first, Some(UserCount::new(1)));
        assert_eq!(second, None);
        assert_eq!(registry.user_count().await, UserCount::new(1));
    }

    #[tokio::test]
    async fn test_disconnect_never_registered_client() {
        // テスト項目: 登録されていないクライアントの切断は何もしない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = DisconnectClientUseCase::new(registry.clone());

        // when (操作):
        let result = usecase.execute(&ConnectionId::generate()).await;

        // then (期待する結果):
        assert_eq!(result, None);
        assert_eq!(registry.user_count().await, UserCount::new(0));
    }
}
