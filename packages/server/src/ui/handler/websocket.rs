//! WebSocket connection handlers.
//!
//! One task pair per connection: the receive loop processes inbound frames strictly one
//! at a time, and the writer drains the connection's member channel into the socket.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::UserId,
    ui::{auth::Identity, state::AppState},
    usecase::{
        ChatSession, ConnectParticipantUseCase, DisconnectParticipantUseCase, EventError,
        EventRouter, RouteOutcome,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(peer_id): Path<i64>,
    Identity(user): Identity,
) -> Result<Response, StatusCode> {
    let Some(user) = user else {
        tracing::warn!("Unauthenticated connection to peer {}; closing", peer_id);
        return Ok(ws.on_upgrade(close_immediately));
    };

    // Convert i64 -> UserId (Domain Model)
    let peer = match UserId::new(peer_id) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Invalid peer user id: {}", peer_id);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let connections = state.connections.clone();
    Ok(ws.on_upgrade(move |socket| {
        connections.track_future(handle_socket(socket, state, user, peer))
    }))
}

/// Close without payload and without touching the registry or the store
async fn close_immediately(mut socket: WebSocket) {
    let _ = socket.send(Message::Close(None)).await;
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user: UserId, peer: UserId) {
    // Create a channel for this connection to receive broadcasts
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = ChatSession::new(user, peer, tx);

    let connect_usecase = ConnectParticipantUseCase::new(state.registry.clone(), state.users.clone());
    let disconnect_usecase =
        DisconnectParticipantUseCase::new(state.registry.clone(), state.users.clone());

    if let Err(e) = connect_usecase.execute(&session).await {
        tracing::error!("User {} could not join room '{}': {}", user, session.room, e);
        disconnect_usecase.execute(&session).await;
        close_immediately(socket).await;
        return;
    }

    let (mut sender, mut receiver) = socket.split();

    // Spawn a task to forward room broadcasts to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // Spawn a task to receive events from this client
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
    let recv_state = state.clone();
    let recv_session = session.clone();
    let mut recv_task = tokio::spawn(async move {
        loop {
            // Only the wait for the next frame is cancellable; processing is not.
            let frame = tokio::select! {
                _ = &mut stop_rx => break,
                _ = recv_state.shutdown.cancelled() => {
                    tracing::info!(
                        "Server shutting down; closing connection of user {}",
                        recv_session.user
                    );
                    break;
                }
                frame = receiver.next() => frame,
            };

            let msg = match frame {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error from user {}: {}", recv_session.user, e);
                    break;
                }
                None => break,
            };

            match msg {
                Message::Text(text) => {
                    process_frame(&recv_state.router, &recv_session, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("User {} requested close", recv_session.user);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            // Writer is gone: stop reading, but let an in-flight event finish first
            let _ = stop_tx.send(());
            let _ = recv_task.await;
        }
    };

    disconnect_usecase.execute(&session).await;
}

async fn process_frame(router: &EventRouter, session: &ChatSession, text: &str) {
    match router.handle_text(session, text).await {
        Ok(RouteOutcome::Broadcast { kind, delivered }) => {
            tracing::debug!(
                "User {} sent '{}' to {} member(s)",
                session.user,
                kind,
                delivered
            );
        }
        Ok(RouteOutcome::Denied(_)) | Ok(RouteOutcome::Ignored) => {}
        Err(EventError::Store(e)) => {
            tracing::warn!("Store failure handling event from user {}: {}", session.user, e);
        }
        Err(e) => {
            tracing::warn!("Dropping event from user {}: {}", session.user, e);
        }
    }
}
