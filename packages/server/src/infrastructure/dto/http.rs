//! HTTP API response DTOs for the chat application.

use serde::{Deserialize, Serialize};

use crate::domain::{Message, User};

/// Active room for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub room_id: String,
    pub members: usize,
}

/// Presence of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusDto {
    pub id: i64,
    pub is_online: bool,
    pub last_seen: Option<String>, // ISO 8601
}

impl From<User> for UserStatusDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.value(),
            is_online: user.is_online,
            last_seen: user.last_seen.map(|ts| ts.to_rfc3339()),
        }
    }
}

/// One message of a conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub message_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub timestamp: String, // ISO 8601
    pub is_read: bool,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            message_id: message.id.value(),
            sender_id: message.sender.value(),
            receiver_id: message.receiver.value(),
            timestamp: message.timestamp.to_rfc3339(),
            content: message.content.into_string(),
            is_read: message.is_read,
        }
    }
}

/// Conversation history between the caller and a peer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDto {
    pub peer_id: i64,
    /// Messages from the peer the caller has not read yet
    pub unread: u64,
    pub messages: Vec<MessageDto>,
}
