//! Domain factories for creating domain entities and value objects.

use super::{RoomId, UserId};

/// Factory for deriving RoomId instances.
///
/// The room of a conversation is not stored anywhere; it is recomputed from the two
/// participants every time a connection joins.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Derive the canonical room for a pair of users.
    ///
    /// The pair is sorted ascending, so `for_pair(a, b) == for_pair(b, a)`.
    pub fn for_pair(a: UserId, b: UserId) -> RoomId {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        RoomId::from_pair(low, high)
    }
}
