//! HTTP routing.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    handler::{get_conversation, get_user_status, health_check, list_rooms, websocket_handler},
    state::AppState,
};

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(list_rooms))
        .route("/api/users/{user_id}", get(get_user_status))
        .route(
            "/api/conversations/{peer_id}/messages",
            get(get_conversation),
        )
        .route("/ws/chat/{peer_id}", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
