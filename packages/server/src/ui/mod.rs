//! UI layer: HTTP / WebSocket surface of the chat server.

pub mod auth;
pub mod handler;
pub mod router;
pub mod runner;
mod signal;
pub mod state;

pub use router::build_router;
pub use runner::{ServerError, run, serve};
pub use state::AppState;
