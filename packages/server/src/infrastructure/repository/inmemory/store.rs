//! InMemory store 実装
//!
//! ドメイン層が定義する MessageRepository / UserRepository trait の具体的な実装。
//! HashMap / BTreeMap をインメモリ DB として使用します。
//!
//! 1 つの Mutex で全状態を守るため、filter + update / delete は常にアトミックです。
//! 開発用および UseCase 層のテスト用。永続化が必要な場合は SQLite 実装を使います。

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Message, MessageContent, MessageId, MessageRepository, RepositoryError, Timestamp, User,
    UserId, UserRepository,
};

#[derive(Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    /// BTreeMap で ID 順（= 作成順）を保持
    messages: BTreeMap<MessageId, Message>,
    last_message_id: i64,
}

/// インメモリ store 実装
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// 新しい空の InMemoryStore を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定したユーザーを登録済みの InMemoryStore を作成
    pub fn with_users(users: impl IntoIterator<Item = UserId>) -> Self {
        let state = StoreState {
            users: users.into_iter().map(|id| (id, User::new(id))).collect(),
            ..StoreState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// メッセージを ID で取得（テスト・デバッグ用）
    pub async fn get_message(&self, id: MessageId) -> Option<Message> {
        let state = self.state.lock().await;
        state.messages.get(&id).cloned()
    }

    /// 保存されているメッセージ数
    pub async fn count_messages(&self) -> usize {
        let state = self.state.lock().await;
        state.messages.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn create_message(
        &self,
        sender: UserId,
        receiver: UserId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError> {
        let mut state = self.state.lock().await;
        if let Some(missing) = [sender, receiver]
            .into_iter()
            .find(|user| !state.users.contains_key(user))
        {
            return Err(RepositoryError::UserNotFound(missing.value()));
        }

        state.last_message_id += 1;
        let message = Message {
            id: MessageId::new(state.last_message_id),
            sender,
            receiver,
            content,
            timestamp: Timestamp::now(),
            is_read: false,
        };
        state.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn delete_message_if_owner(
        &self,
        id: MessageId,
        sender: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        let owned = state.messages.get(&id).is_some_and(|m| m.sender == sender);
        if owned {
            state.messages.remove(&id);
        }
        Ok(owned)
    }

    async fn edit_message_if_owner(
        &self,
        id: MessageId,
        sender: UserId,
        content: MessageContent,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        match state.messages.get_mut(&id) {
            Some(message) if message.sender == sender => {
                message.content = content;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_read_from(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;
        let mut flipped = 0;
        for message in state
            .messages
            .values_mut()
            .filter(|m| m.sender == sender && m.receiver == receiver && !m.is_read)
        {
            message.is_read = true;
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn conversation(&self, a: UserId, b: UserId) -> Result<Vec<Message>, RepositoryError> {
        let state = self.state.lock().await;
        let mut messages: Vec<Message> = state
            .messages
            .values()
            .filter(|m| (m.sender == a && m.receiver == b) || (m.sender == b && m.receiver == a))
            .cloned()
            .collect();
        messages.sort_by_key(|m| (m.timestamp, m.id));
        Ok(messages)
    }

    async fn unread_count(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<u64, RepositoryError> {
        let state = self.state.lock().await;
        let count = state
            .messages
            .values()
            .filter(|m| m.sender == sender && m.receiver == receiver && !m.is_read)
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn set_online(&self, user: UserId, online: bool) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if let Some(entry) = state.users.get_mut(&user) {
            entry.is_online = online;
            if !online {
                entry.last_seen = Some(Timestamp::now());
            }
        }
        Ok(())
    }

    async fn find_user(&self, user: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.users.get(&user).cloned())
    }

    async fn register_user(&self, user: UserId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        state.users.entry(user).or_insert_with(|| User::new(user));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryStore のメッセージ CRUD と既読化、オンライン状態の切り替え
    //
    // 【なぜこのテストが必要か】
    // - UseCase 層は「所有者のみ編集・削除できる」ことを store の戻り値で判定する
    // - 既読化は送信者→受信者の未読メッセージだけに作用する必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. メッセージ作成（存在しない受信者はエラー）
    // 2. 所有者による削除・編集と、非所有者による削除・編集の拒否
    // 3. 既読化の対象範囲
    // 4. オンライン状態と last_seen
    // ========================================

    fn uid(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text.to_string())
    }

    fn create_test_store() -> InMemoryStore {
        InMemoryStore::with_users([uid(3), uid(7), uid(9)])
    }

    #[tokio::test]
    async fn test_create_message_success() {
        // テスト項目: メッセージが未読・連番 ID で作成される
        // given (前提条件):
        let store = create_test_store();

        // when (操作):
        let first = store
            .create_message(uid(3), uid(7), content("hi"))
            .await
            .unwrap();
        let second = store
            .create_message(uid(7), uid(3), content("hello"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(first.id, MessageId::new(1));
        assert_eq!(second.id, MessageId::new(2));
        assert!(!first.is_read);
        assert_eq!(first.sender, uid(3));
        assert_eq!(first.receiver, uid(7));
        assert_eq!(store.count_messages().await, 2);
    }

    #[tokio::test]
    async fn test_create_message_unknown_receiver() {
        // テスト項目: 存在しない受信者へのメッセージはエラー
        // given (前提条件):
        let store = create_test_store();

        // when (操作):
        let result = store.create_message(uid(3), uid(404), content("hi")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::UserNotFound(404)));
        assert_eq!(store.count_messages().await, 0);
    }

    #[tokio::test]
    async fn test_create_message_unknown_sender() {
        // テスト項目: users に登録されていない送信者のメッセージは UserNotFound で拒否される
        // given (前提条件):
        let store = create_test_store();

        // when (操作):
        let result = store.create_message(uid(404), uid(7), content("hi")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::UserNotFound(404)));
        assert_eq!(store.count_messages().await, 0);
    }

    #[tokio::test]
    async fn test_delete_message_owner_only() {
        // テスト項目: 所有者のみメッセージを削除できる
        // given (前提条件):
        let store = create_test_store();
        let message = store
            .create_message(uid(3), uid(7), content("hi"))
            .await
            .unwrap();

        // when (操作): 受信者が削除を試みる
        let by_receiver = store.delete_message_if_owner(message.id, uid(7)).await;

        // then (期待する結果): マッチせず、メッセージは残る
        assert_eq!(by_receiver, Ok(false));
        assert!(store.get_message(message.id).await.is_some());

        // when (操作): 送信者が削除する
        let by_sender = store.delete_message_if_owner(message.id, uid(3)).await;

        // then (期待する結果):
        assert_eq!(by_sender, Ok(true));
        assert!(store.get_message(message.id).await.is_none());

        // 2回目はマッチしない
        assert_eq!(
            store.delete_message_if_owner(message.id, uid(3)).await,
            Ok(false)
        );
    }

    #[tokio::test]
    async fn test_edit_message_owner_only() {
        // テスト項目: 所有者のみメッセージを編集できる
        // given (前提条件):
        let store = create_test_store();
        let message = store
            .create_message(uid(3), uid(7), content("hi"))
            .await
            .unwrap();

        // when (操作):
        let by_receiver = store
            .edit_message_if_owner(message.id, uid(7), content("hacked"))
            .await;
        let by_sender = store
            .edit_message_if_owner(message.id, uid(3), content("hi there"))
            .await;
        let missing = store
            .edit_message_if_owner(MessageId::new(999), uid(3), content("nope"))
            .await;

        // then (期待する結果):
        assert_eq!(by_receiver, Ok(false));
        assert_eq!(by_sender, Ok(true));
        assert_eq!(missing, Ok(false));
        let stored = store.get_message(message.id).await.unwrap();
        assert_eq!(stored.content.as_str(), "hi there");
        assert_eq!(stored.timestamp, message.timestamp);
    }

    #[tokio::test]
    async fn test_mark_read_from_scoped_to_pair() {
        // テスト項目: 既読化は送信者→受信者の未読メッセージだけに作用する
        // given (前提条件):
        let store = create_test_store();
        let a = store.create_message(uid(3), uid(7), content("1")).await.unwrap();
        let b = store.create_message(uid(3), uid(7), content("2")).await.unwrap();
        let own = store.create_message(uid(7), uid(3), content("3")).await.unwrap();
        let other = store.create_message(uid(9), uid(7), content("4")).await.unwrap();

        // when (操作): 7 が 3 からのメッセージを既読にする
        let flipped = store.mark_read_from(uid(3), uid(7)).await.unwrap();

        // then (期待する結果):
        assert_eq!(flipped, 2);
        assert!(store.get_message(a.id).await.unwrap().is_read);
        assert!(store.get_message(b.id).await.unwrap().is_read);
        assert!(!store.get_message(own.id).await.unwrap().is_read);
        assert!(!store.get_message(other.id).await.unwrap().is_read);

        // 2回目は何も変わらない
        assert_eq!(store.mark_read_from(uid(3), uid(7)).await, Ok(0));
        assert_eq!(store.unread_count(uid(9), uid(7)).await, Ok(1));
    }

    #[tokio::test]
    async fn test_conversation_both_directions() {
        // テスト項目: 会話履歴は双方向のメッセージを古い順に返す
        // given (前提条件):
        let store = create_test_store();
        store.create_message(uid(3), uid(7), content("1")).await.unwrap();
        store.create_message(uid(9), uid(3), content("x")).await.unwrap();
        store.create_message(uid(7), uid(3), content("2")).await.unwrap();

        // when (操作):
        let history = store.conversation(uid(7), uid(3)).await.unwrap();

        // then (期待する結果):
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_set_online_and_last_seen() {
        // テスト項目: オフライン化で last_seen が記録される
        // given (前提条件):
        let store = create_test_store();

        // when (操作):
        store.set_online(uid(3), true).await.unwrap();
        let online = store.find_user(uid(3)).await.unwrap().unwrap();
        store.set_online(uid(3), false).await.unwrap();
        let offline = store.find_user(uid(3)).await.unwrap().unwrap();

        // then (期待する結果):
        assert!(online.is_online);
        assert_eq!(online.last_seen, None);
        assert!(!offline.is_online);
        assert!(offline.last_seen.is_some());
    }

    #[tokio::test]
    async fn test_set_online_unknown_user_is_noop() {
        // テスト項目: 存在しないユーザーのオンライン切り替えはエラーにならない
        let store = create_test_store();
        assert_eq!(store.set_online(uid(404), true).await, Ok(()));
        assert_eq!(store.find_user(uid(404)).await, Ok(None));
    }

    #[tokio::test]
    async fn test_register_user_idempotent() {
        // テスト項目: 既存ユーザーの再登録は状態を上書きしない
        // given (前提条件):
        let store = create_test_store();
        store.set_online(uid(3), true).await.unwrap();

        // when (操作):
        store.register_user(uid(3)).await.unwrap();
        store.register_user(uid(11)).await.unwrap();

        // then (期待する結果):
        assert!(store.find_user(uid(3)).await.unwrap().unwrap().is_online);
        assert!(store.find_user(uid(11)).await.unwrap().is_some());
    }
}
