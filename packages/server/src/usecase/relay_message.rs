//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - 入力検証（sender / message の欠落・空・長さ制限）とサーバー時刻の付与
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者を含む全接続へ new-message がブロードキャストされる
//! - 異常系：sender / message が欠けている、空である
//! - エッジケース：長さ制限ちょうど、制限超過

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::{
    config::MessageLimits,
    domain::{
        BroadcastReport, ChatMessage, ConnectionId, ConnectionRegistry, MessageBody, SenderName,
        ServerEvent, Timestamp,
    },
};

use super::error::RelayError;

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
    limits: MessageLimits,
}

impl RelayMessageUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        clock: Arc<dyn Clock>,
        limits: MessageLimits,
    ) -> Self {
        Self {
            registry,
            clock,
            limits,
        }
    }

    /// Validate an inbound chat message, stamp it and broadcast it to every
    /// connection, the sender included.
    ///
    /// # Arguments
    ///
    /// * `from` - The connection the message arrived on
    /// * `sender` - Client-supplied display name
    /// * `message` - Client-supplied body
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - the message was broadcast
    /// * `Err(RelayError)` - the message was dropped; nothing was sent
    pub async fn execute(
        &self,
        from: &ConnectionId,
        sender: Option<String>,
        message: Option<String>,
    ) -> Result<BroadcastReport, RelayError> {
        let chat_message = self.build_message(sender, message)?;
        tracing::info!(
            "Relaying message from '{}' (connection '{}'): {}",
            chat_message.sender.as_str(),
            from,
            chat_message.body.as_str()
        );

        Ok(self
            .registry
            .broadcast(ServerEvent::NewMessage(chat_message))
            .await)
    }

    fn build_message(
        &self,
        sender: Option<String>,
        message: Option<String>,
    ) -> Result<ChatMessage, RelayError> {
        let sender = sender
            .and_then(|s| SenderName::new(s).ok())
            .ok_or(RelayError::InvalidSender)?;
        let body = message
            .and_then(|m| MessageBody::new(m).ok())
            .ok_or(RelayError::InvalidMessage)?;

        if let Some(max) = self.limits.max_sender_len {
            let actual = sender.char_count();
            if actual > max {
                return Err(RelayError::SenderTooLong { max, actual });
            }
        }
        if let Some(max) = self.limits.max_message_len {
            let actual = body.char_count();
            if actual > max {
                return Err(RelayError::MessageTooLong { max, actual });
            }
        }

        Ok(ChatMessage::new(sender, body, Timestamp::new(self.clock.now())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::MockConnectionRegistry, infrastructure::registry::InMemoryConnectionRegistry,
    };
    use hiroba_shared::time::FixedClock;
    use tokio::sync::mpsc;

    const FIXED_MILLIS: i64 = 1_714_564_800_000; // 2024-05-01T12:00:00.000Z

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::from_millis(FIXED_MILLIS).unwrap())
    }

    fn no_broadcast_registry() -> Arc<MockConnectionRegistry> {
        let mut registry = MockConnectionRegistry::new();
        registry.expect_broadcast().times(0);
        Arc::new(registry)
    }

    fn usecase_with(
        registry: Arc<dyn ConnectionRegistry>,
        limits: MessageLimits,
    ) -> RelayMessageUseCase {
        RelayMessageUseCase::new(registry, fixed_clock(), limits)
    }

    #[tokio::test]
    async fn test_relay_valid_message_broadcasts_once_with_server_timestamp() {
        // テスト項目: 正しいメッセージはサーバー時刻付きで一度だけブロードキャストされる
        // given (前提条件):
        let mut registry = MockConnectionRegistry::new();
        registry
            .expect_broadcast()
            .times(1)
            .withf(|event| match event {
                ServerEvent::NewMessage(msg) => {
                    msg.sender.as_str() == "alice"
                        && msg.body.as_str() == "hi"
                        && msg.timestamp.to_iso8601() == "2024-05-01T12:00:00.000Z"
                }
                _ => false,
            })
            .returning(|_| BroadcastReport {
                delivered: 2,
                dropped: vec![],
            });
        let usecase = usecase_with(Arc::new(registry), MessageLimits::default());

        // when (操作):
        let result = usecase
            .execute(
                &ConnectionId::generate(),
                Some("alice".to_string()),
                Some("hi".to_string()),
            )
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap().delivered, 2);
    }

    #[tokio::test]
    async fn test_relay_missing_sender_is_dropped() {
        // テスト項目: sender が無いメッセージはブロードキャストされない
        // given (前提条件):
        let usecase = usecase_with(no_broadcast_registry(), MessageLimits::default());

        // when (操作):
        let result = usecase
            .execute(&ConnectionId::generate(), None, Some("hi".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RelayError::InvalidSender));
    }

    #[tokio::test]
    async fn test_relay_empty_sender_is_dropped() {
        // テスト項目: sender が空文字列のメッセージはブロードキャストされない
        // given (前提条件):
        let usecase = usecase_with(no_broadcast_registry(), MessageLimits::default());

        // when (操作):
        let result = usecase
            .execute(
                &ConnectionId::generate(),
                Some(String::new()),
                Some("hi".to_string()),
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RelayError::InvalidSender));
    }

    #[tokio::test]
    async fn test_relay_empty_or_missing_message_is_dropped() {
        // テスト項目: message が空・欠落のメッセージはブロードキャストされない
        // given (前提条件):
        let usecase = usecase_with(no_broadcast_registry(), MessageLimits::default());
        let from = ConnectionId::generate();

        // when (操作):
        let empty = usecase
            .execute(&from, Some("alice".to_string()), Some(String::new()))
            .await;
        let missing = usecase.execute(&from, Some("alice".to_string()), None).await;

        // then (期待する結果):
        assert_eq!(empty, Err(RelayError::InvalidMessage));
        assert_eq!(missing, Err(RelayError::InvalidMessage));
    }

    #[tokio::test]
    async fn test_relay_whitespace_only_fields_are_broadcast() {
        // テスト項目: 空白のみの sender / message は空ではないので中継される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let a = ConnectionId::generate();
        registry.register(a, tx).await;
        while rx.try_recv().is_ok() {}
        let usecase = usecase_with(registry, MessageLimits::default());

        // when (操作):
        let blank_sender = usecase
            .execute(&a, Some(" ".to_string()), Some("hi".to_string()))
            .await;
        let blank_message = usecase
            .execute(&a, Some("alice".to_string()), Some("\n".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(blank_sender.unwrap().delivered, 1);
        assert_eq!(blank_message.unwrap().delivered, 1);
        let first: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        let second: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(first["data"]["sender"], " ");
        assert_eq!(second["data"]["message"], "\n");
    }

    #[tokio::test]
    async fn test_relay_enforces_length_limits() {
        // テスト項目: 長さ制限を超えたメッセージは破棄され、ちょうどの長さは中継される
        // given (前提条件):
        let mut registry = MockConnectionRegistry::new();
        registry
            .expect_broadcast()
            .times(1)
            .returning(|_| BroadcastReport::default());
        let limits = MessageLimits {
            max_sender_len: Some(5),
            max_message_len: Some(3),
        };
        let usecase = usecase_with(Arc::new(registry), limits);
        let from = ConnectionId::generate();

        // when (操作):
        let long_sender = usecase
            .execute(&from, Some("alice!".to_string()), Some("hi".to_string()))
            .await;
        let long_message = usecase
            .execute(&from, Some("alice".to_string()), Some("hiya".to_string()))
            .await;
        let exact = usecase
            .execute(&from, Some("alice".to_string()), Some("hey".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(
            long_sender,
            Err(RelayError::SenderTooLong { max: 5, actual: 6 })
        );
        assert_eq!(
            long_message,
            Err(RelayError::MessageTooLong { max: 3, actual: 4 })
        );
        assert!(exact.is_ok());
    }

    #[tokio::test]
    async fn test_relay_reaches_sender_and_others() {
        // テスト項目: 送信者自身を含む全接続に new-message が届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let a = ConnectionId::generate();
        registry.register(a, tx_a).await;
        registry.register(ConnectionId::generate(), tx_b).await;
        while rx_a.try_recv().is_ok() {}
        while rx_b.try_recv().is_ok() {}
        let usecase = usecase_with(registry, MessageLimits::default());

        // when (操作):
        let report = usecase
            .execute(&a, Some("alice".to_string()), Some("hi".to_string()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        let expected = r#"{"event":"new-message","data":{"message":"hi","sender":"alice","timestamp":"2024-05-01T12:00:00.000Z"}}"#;
        assert_eq!(rx_a.try_recv().unwrap(), expected);
        assert_eq!(rx_b.try_recv().unwrap(), expected);
    }
}
