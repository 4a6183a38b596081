//! One-to-one WebSocket chat server.
//!
//! Each pair of users shares a room whose id is derived from both user ids. Events sent
//! on a connection are applied to the message store and then broadcast to every
//! connection joined to that room.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{AppState, ServerError, build_router, run, serve};
