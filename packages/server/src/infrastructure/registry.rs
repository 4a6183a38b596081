//! Room Registry
//!
//! Process-wide mapping from room identifier to the channels of the connections
//! currently joined to it. One instance is created at startup and shared by handle
//! with every connection task.
//!
//! Every operation takes the same lock, so a broadcast sees a consistent member set
//! and messages pushed by one broadcast are queued on every member channel before the
//! next broadcast starts. That is what gives per-room delivery ordering.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::{ConnectionId, RoomId};

/// Outbound channel of one connection. The connection's writer task drains it.
pub type MemberSender = UnboundedSender<String>;

/// Membership registry for all rooms in this process
#[derive(Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomId, HashMap<ConnectionId, MemberSender>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room.
    ///
    /// Returns `false` if the connection was already a member (nothing changes).
    pub async fn join(
        &self,
        room: &RoomId,
        connection: ConnectionId,
        sender: MemberSender,
    ) -> bool {
        let mut rooms = self.rooms.lock().await;
        let members = rooms.entry(room.clone()).or_default();
        if members.contains_key(&connection) {
            return false;
        }
        members.insert(connection, sender);
        tracing::debug!(
            "Connection {} joined room '{}' ({} members)",
            connection,
            room,
            members.len()
        );
        true
    }

    /// Remove a connection from a room. Empty rooms are pruned.
    ///
    /// Returns `false` if the connection was not a member.
    pub async fn leave(&self, room: &RoomId, connection: ConnectionId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(members) = rooms.get_mut(room) else {
            return false;
        };
        let removed = members.remove(&connection).is_some();
        if members.is_empty() {
            rooms.remove(room);
        }
        removed
    }

    /// Deliver a payload to every member of a room.
    ///
    /// Delivery is fire-and-forget per member: a closed channel is logged and skipped.
    /// Returns the number of members the payload was queued for.
    pub async fn broadcast(&self, room: &RoomId, payload: &str) -> usize {
        let rooms = self.rooms.lock().await;
        let Some(members) = rooms.get(room) else {
            return 0;
        };

        let mut delivered = 0;
        for (connection, sender) in members {
            if sender.send(payload.to_string()).is_err() {
                tracing::warn!(
                    "Failed to deliver to connection {} in room '{}'",
                    connection,
                    room
                );
                continue;
            }
            delivered += 1;
        }
        delivered
    }

    /// Number of connections joined to a room
    pub async fn member_count(&self, room: &RoomId) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.get(room).map_or(0, HashMap::len)
    }

    /// Snapshot of every non-empty room and its member count, sorted by room id
    pub async fn active_rooms(&self) -> BTreeMap<RoomId, usize> {
        let rooms = self.rooms.lock().await;
        rooms
            .iter()
            .map(|(room, members)| (room.clone(), members.len()))
            .collect()
    }
}
