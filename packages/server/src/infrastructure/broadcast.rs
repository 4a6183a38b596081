//! Broadcast Dispatcher
//!
//! Serializes an outbound event into the wire format and fans it out to a room.

use std::sync::Arc;

use crate::{domain::RoomId, infrastructure::dto::websocket::OutboundEvent};

use super::registry::{MemberSender, RoomRegistry};

/// Serializes outbound events and hands them to the Room Registry
#[derive(Clone)]
pub struct BroadcastDispatcher {
    registry: Arc<RoomRegistry>,
}

impl BroadcastDispatcher {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Broadcast an event to every member of `room`.
    ///
    /// Returns the number of member channels the event was queued on.
    pub async fn dispatch(&self, room: &RoomId, event: &OutboundEvent) -> usize {
        let Some(payload) = encode(event) else {
            return 0;
        };
        let delivered = self.registry.broadcast(room, &payload).await;
        tracing::debug!(
            "Broadcasted '{}' to {} member(s) of room '{}'",
            event.kind(),
            delivered,
            room
        );
        delivered
    }

    /// Send an event to a single connection only.
    pub fn send_to(&self, sender: &MemberSender, event: &OutboundEvent) -> bool {
        match encode(event) {
            Some(payload) => sender.send(payload).is_ok(),
            None => false,
        }
    }
}

fn encode(event: &OutboundEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::error!("Failed to serialize '{}' event: {}", event.kind(), e);
            None
        }
    }
}
