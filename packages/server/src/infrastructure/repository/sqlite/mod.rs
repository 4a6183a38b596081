//! SQLite store 実装
//!
//! `sqlx` を使った永続化実装。スキーマは起動時に存在しなければ作成します。
//! 所有者チェック付きの更新・削除は 1 つの SQL 文で行い、行単位のアトミック性は
//! SQLite に任せます（アプリケーション側ではロックしない）。

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::domain::{
    Message, MessageContent, MessageId, MessageRepository, RepositoryError, Timestamp, User,
    UserId, UserRepository,
};

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    is_online INTEGER NOT NULL DEFAULT 0,
    last_seen INTEGER
)";

const CREATE_MESSAGES: &str = "CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sender_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    receiver_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    is_read INTEGER NOT NULL DEFAULT 0
)";

const CREATE_MESSAGES_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_messages_pair
    ON messages (sender_id, receiver_id, is_read)";

type MessageRow = (i64, i64, i64, String, i64, bool);

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(err.to_string())
    }
}

/// SQLite store 実装
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// データベースに接続し、スキーマを準備する
    ///
    /// `sqlite::memory:` の場合は接続ごとに別 DB になるため、プールを 1 接続に固定します。
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = database_url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 16 })
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        tracing::info!("Connected to SQLite store at '{}'", database_url);
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), RepositoryError> {
        for statement in [CREATE_USERS, CREATE_MESSAGES, CREATE_MESSAGES_INDEX] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn user_exists(&self, user: UserId) -> Result<bool, RepositoryError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
            .bind(user.value())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

fn corrupt(what: &str) -> RepositoryError {
    RepositoryError::Database(format!("corrupt row: {what}"))
}

fn row_to_message(
    (id, sender_id, receiver_id, content, timestamp, is_read): MessageRow,
) -> Result<Message, RepositoryError> {
    Ok(Message {
        id: MessageId::new(id),
        sender: UserId::new(sender_id).map_err(|_| corrupt("sender_id"))?,
        receiver: UserId::new(receiver_id).map_err(|_| corrupt("receiver_id"))?,
        content: MessageContent::new(content),
        timestamp: Timestamp::new(timestamp),
        is_read,
    })
}

#[async_trait]
impl MessageRepository for SqliteStore {
    async fn create_message(
        &self,
        sender: UserId,
        receiver: UserId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError> {
        for user in [sender, receiver] {
            if !self.user_exists(user).await? {
                return Err(RepositoryError::UserNotFound(user.value()));
            }
        }

        let timestamp = Timestamp::now();
        let result = sqlx::query(
            "INSERT INTO messages (sender_id, receiver_id, content, timestamp, is_read) VALUES (?, ?, ?, ?, 0)",
        )
        .bind(sender.value())
        .bind(receiver.value())
        .bind(content.as_str())
        .bind(timestamp.value())
        .execute(&self.pool)
        .await?;

        Ok(Message {
            id: MessageId::new(result.last_insert_rowid()),
            sender,
            receiver,
            content,
            timestamp,
            is_read: false,
        })
    }

    async fn delete_message_if_owner(
        &self,
        id: MessageId,
        sender: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ? AND sender_id = ?")
            .bind(id.value())
            .bind(sender.value())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn edit_message_if_owner(
        &self,
        id: MessageId,
        sender: UserId,
        content: MessageContent,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE messages SET content = ? WHERE id = ? AND sender_id = ?")
            .bind(content.as_str())
            .bind(id.value())
            .bind(sender.value())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_read_from(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = 1 WHERE sender_id = ? AND receiver_id = ? AND is_read = 0",
        )
        .bind(sender.value())
        .bind(receiver.value())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn conversation(&self, a: UserId, b: UserId) -> Result<Vec<Message>, RepositoryError> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, sender_id, receiver_id, content, timestamp, is_read FROM messages
             WHERE (sender_id = ? AND receiver_id = ?) OR (sender_id = ? AND receiver_id = ?)
             ORDER BY timestamp, id",
        )
        .bind(a.value())
        .bind(b.value())
        .bind(b.value())
        .bind(a.value())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_message).collect()
    }

    async fn unread_count(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages WHERE sender_id = ? AND receiver_id = ? AND is_read = 0",
        )
        .bind(sender.value())
        .bind(receiver.value())
        .fetch_one(&self.pool)
        .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn set_online(&self, user: UserId, online: bool) -> Result<(), RepositoryError> {
        let query = if online {
            sqlx::query("UPDATE users SET is_online = 1 WHERE id = ?").bind(user.value())
        } else {
            sqlx::query("UPDATE users SET is_online = 0, last_seen = ? WHERE id = ?")
                .bind(Timestamp::now().value())
                .bind(user.value())
        };
        query.execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user(&self, user: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<(i64, bool, Option<i64>)> =
            sqlx::query_as("SELECT id, is_online, last_seen FROM users WHERE id = ?")
                .bind(user.value())
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(id, is_online, last_seen)| {
            Ok(User {
                id: UserId::new(id).map_err(|_| corrupt("id"))?,
                is_online,
                last_seen: last_seen.map(Timestamp::new),
            })
        })
        .transpose()
    }

    async fn register_user(&self, user: UserId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT OR IGNORE INTO users (id) VALUES (?)")
            .bind(user.value())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
