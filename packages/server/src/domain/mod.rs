//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Message, User};
pub use error::{RepositoryError, ValueObjectError};
pub use factory::RoomIdFactory;
pub use repository::{MessageRepository, UserRepository};
pub use value_object::{ConnectionId, MessageContent, MessageId, RoomId, Timestamp, UserId};

#[cfg(test)]
pub use repository::{MockMessageRepository, MockUserRepository};
