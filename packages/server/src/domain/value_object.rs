//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::ValueObjectError;

/// User identifier value object.
///
/// Users are owned by the external account system; the core only references them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Arguments
    ///
    /// * `id` - The numeric user identifier (must be positive)
    ///
    /// # Returns
    ///
    /// A Result containing the UserId or an error if validation fails
    pub fn new(id: i64) -> Result<Self, ValueObjectError> {
        if id <= 0 {
            return Err(ValueObjectError::UserIdNotPositive(id));
        }
        Ok(Self(id))
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::str::FromStr for UserId {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValueObjectError::UserIdInvalidFormat(s.to_string()))?;
        Self::new(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message identifier value object, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// A room is scoped to exactly two users. Its identifier is canonical: the pair is
/// sorted ascending before formatting, so both participants derive the same value.
/// Construct it with [`RoomIdFactory::for_pair`](super::RoomIdFactory::for_pair).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub(super) fn from_pair(low: UserId, high: UserId) -> Self {
        Self(format!("chat_{}_{}", low, high))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Represents the content of a chat message.
///
/// Any string delivered on the wire is accepted, including the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    pub fn new(content: String) -> Self {
        Self(content)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    ///
    /// # Arguments
    ///
    /// * `value` - Unix timestamp in milliseconds
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self(pairchat_shared::time::get_utc_timestamp())
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// RFC 3339 rendering used on the wire.
    pub fn to_rfc3339(&self) -> String {
        pairchat_shared::time::timestamp_to_rfc3339(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one live connection.
///
/// A user may hold several connections to the same room; each one is a separate member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh connection id (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_new_success() {
        // テスト項目: 正の整数からユーザー ID を作成できる
        // given (前提条件):
        let id = 3;

        // when (操作):
        let result = UserId::new(id);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().value(), 3);
    }

    #[test]
    fn test_user_id_not_positive_fails() {
        // テスト項目: 0 以下のユーザー ID は作成できない
        // when (操作):
        let zero = UserId::new(0);
        let negative = UserId::new(-7);

        // then (期待する結果):
        assert_eq!(zero.unwrap_err(), ValueObjectError::UserIdNotPositive(0));
        assert_eq!(negative.unwrap_err(), ValueObjectError::UserIdNotPositive(-7));
    }

    #[test]
    fn test_user_id_from_str() {
        // テスト項目: 文字列（ヘッダー値など）からユーザー ID を解析できる
        // then (期待する結果):
        assert_eq!(" 42 ".parse::<UserId>().unwrap().value(), 42);
        assert_eq!(
            "abc".parse::<UserId>().unwrap_err(),
            ValueObjectError::UserIdInvalidFormat("abc".to_string())
        );
    }

    #[test]
    fn test_message_content_keeps_text() {
        // テスト項目: メッセージ内容は受け取った文字列をそのまま保持する
        // given (前提条件):
        let content = "Hello, world!".to_string();

        // when (操作):
        let content = MessageContent::new(content);

        // then (期待する結果):
        assert_eq!(content.as_str(), "Hello, world!");
        assert_eq!(content.to_string(), "Hello, world!");
    }

    #[test]
    fn test_message_content_accepts_empty_and_long_text() {
        // テスト項目: 空文字列や長い文字列も検証なしで受け付ける
        assert_eq!(MessageContent::new(String::new()).as_str(), "");
        let long = "a".repeat(20_000);
        assert_eq!(MessageContent::new(long.clone()).into_string(), long);
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert!(ts2 > ts1);
    }

    #[test]
    fn test_connection_id_unique() {
        // テスト項目: 接続 ID は毎回異なる
        assert_ne!(ConnectionId::generate(), ConnectionId::generate());
    }
}
