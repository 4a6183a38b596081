//! WebSocket event DTOs for the chat application.
//!
//! Inbound and outbound events share a `type` discriminator field.

use serde::{Deserialize, Serialize};

use crate::domain::Message;

/// Event received from a client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Message {
        content: String,
    },
    DeleteMessage {
        message_id: i64,
    },
    EditMessage {
        message_id: i64,
        content: String,
    },
    ReadReceipt,
    Typing {
        is_typing: bool,
    },
    /// Any `type` this server does not know about
    #[serde(other)]
    Unknown,
}

/// Action named in a `denied` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeniedAction {
    EditMessage,
    DeleteMessage,
}

/// Event sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    Message {
        message_id: i64,
        sender_id: i64,
        content: String,
        /// RFC 3339
        timestamp: String,
        is_read: bool,
    },
    MessageDeleted {
        message_id: i64,
    },
    MessageEdited {
        message_id: i64,
        content: String,
    },
    ReadReceipt {
        reader_id: i64,
    },
    Typing {
        user_id: i64,
        is_typing: bool,
    },
    /// Only sent to the requester, and only under the `notify` denial policy
    Denied {
        action: DeniedAction,
        message_id: i64,
    },
}

impl OutboundEvent {
    /// Build the `message` event for a freshly stored message
    pub fn from_message(message: &Message) -> Self {
        Self::Message {
            message_id: message.id.value(),
            sender_id: message.sender.value(),
            content: message.content.as_str().to_string(),
            timestamp: message.timestamp.to_rfc3339(),
            is_read: message.is_read,
        }
    }

    /// Wire name of the event, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::MessageDeleted { .. } => "message_deleted",
            Self::MessageEdited { .. } => "message_edited",
            Self::ReadReceipt { .. } => "read_receipt",
            Self::Typing { .. } => "typing",
            Self::Denied { .. } => "denied",
        }
    }
}
