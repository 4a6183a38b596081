//! Repository traits (store collaborator contract).
//!
//! The domain layer defines what it needs from persistence; the infrastructure layer
//! provides the implementations (dependency inversion). Every filter+mutate operation
//! must be atomic in the implementation, since the core adds no locking of its own.

use async_trait::async_trait;

use super::{
    Message, MessageContent, MessageId, RepositoryError, User, UserId,
};

/// Persistent message collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Create an unread message stamped with the current time.
    ///
    /// Fails with `RepositoryError::UserNotFound` when the receiver does not exist.
    async fn create_message(
        &self,
        sender: UserId,
        receiver: UserId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError>;

    /// Hard-delete the message if `sender` owns it. Returns whether a row matched.
    async fn delete_message_if_owner(
        &self,
        id: MessageId,
        sender: UserId,
    ) -> Result<bool, RepositoryError>;

    /// Replace the content if `sender` owns the message. Returns whether a row matched.
    async fn edit_message_if_owner(
        &self,
        id: MessageId,
        sender: UserId,
        content: MessageContent,
    ) -> Result<bool, RepositoryError>;

    /// Mark every unread message `sender -> receiver` as read. Returns the number flipped.
    async fn mark_read_from(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<u64, RepositoryError>;

    /// Both directions of a conversation, oldest first.
    async fn conversation(&self, a: UserId, b: UserId) -> Result<Vec<Message>, RepositoryError>;

    /// Number of unread messages `sender -> receiver`.
    async fn unread_count(&self, sender: UserId, receiver: UserId)
    -> Result<u64, RepositoryError>;
}

/// User presence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Toggle the online flag. Going offline also stamps `last_seen`.
    /// Unknown users are ignored.
    async fn set_online(&self, user: UserId, online: bool) -> Result<(), RepositoryError>;

    async fn find_user(&self, user: UserId) -> Result<Option<User>, RepositoryError>;

    /// Make sure the user exists. Existing users are left untouched.
    async fn register_user(&self, user: UserId) -> Result<(), RepositoryError>;
}
