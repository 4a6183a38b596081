//! HTTP API endpoint handlers.
//!
//! Read-only views over the store and the Room Registry.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::UserId,
    infrastructure::dto::http::{ConversationDto, MessageDto, RoomSummaryDto, UserStatusDto},
    ui::{auth::RequireUser, state::AppState},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List rooms that currently have at least one connection
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.registry.active_rooms().await;
    Json(
        rooms
            .into_iter()
            .map(|(room_id, members)| RoomSummaryDto {
                room_id: room_id.into_string(),
                members,
            })
            .collect(),
    )
}

/// Presence of a single user
pub async fn get_user_status(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserStatusDto>, StatusCode> {
    let user_id = UserId::new(user_id).map_err(|_| StatusCode::NOT_FOUND)?;
    match state.users.find_user(user_id).await {
        Ok(Some(user)) => Ok(Json(user.into())),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load user {}: {}", user_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Conversation history between the caller and a peer.
///
/// Unlike the WebSocket `read_receipt` event, viewing history does not mark anything read.
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Path(peer_id): Path<i64>,
) -> Result<Json<ConversationDto>, StatusCode> {
    let peer = UserId::new(peer_id).map_err(|_| StatusCode::NOT_FOUND)?;

    let history = state.messages.conversation(user, peer).await;
    let unread = state.messages.unread_count(peer, user).await;
    match (history, unread) {
        (Ok(messages), Ok(unread)) => Ok(Json(ConversationDto {
            peer_id: peer.value(),
            unread,
            messages: messages.into_iter().map(MessageDto::from).collect(),
        })),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(
                "Failed to load conversation between {} and {}: {}",
                user,
                peer,
                e
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
