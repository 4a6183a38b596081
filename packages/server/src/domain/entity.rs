//! Core domain models for the chat application.

use serde::{Deserialize, Serialize};

use super::value_object::{MessageContent, MessageId, Timestamp, UserId};

/// A user as seen by the messaging core.
///
/// Accounts themselves are managed elsewhere; the core only toggles presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub is_online: bool,
    /// Set when the user goes offline; `None` until the first disconnect
    pub last_seen: Option<Timestamp>,
}

impl User {
    /// Create a user that has never connected
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            is_online: false,
            last_seen: None,
        }
    }
}

/// Represents a persisted chat message between two users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned identifier
    pub id: MessageId,
    pub sender: UserId,
    pub receiver: UserId,
    /// Mutable by the sender through edits
    pub content: MessageContent,
    /// Creation time; never changes
    pub timestamp: Timestamp,
    /// Flips false -> true once the receiver issues a read receipt
    pub is_read: bool,
}
