//! Infrastructure layer: stores, room membership, fan-out and wire formats.

pub mod broadcast;
pub mod dto;
pub mod registry;
pub mod repository;

pub use broadcast::BroadcastDispatcher;
pub use registry::{MemberSender, RoomRegistry};
