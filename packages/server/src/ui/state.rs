//! Server state shared by every handler.

use std::sync::Arc;

use axum::http::HeaderName;
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::{
    domain::{MessageRepository, UserRepository},
    infrastructure::{BroadcastDispatcher, RoomRegistry},
    usecase::{DenialPolicy, EventRouter},
};

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub messages: Arc<dyn MessageRepository>,
    pub users: Arc<dyn UserRepository>,
    /// Room membership of every live connection in this process
    pub registry: Arc<RoomRegistry>,
    /// Stateless; shared by all connections
    pub router: EventRouter,
    /// Header carrying the user id set by the upstream auth layer
    pub identity_header: HeaderName,
    /// Cancelled once the server starts shutting down
    pub shutdown: CancellationToken,
    /// Upgraded WebSocket connections, drained before the server exits
    pub connections: TaskTracker,
}

impl AppState {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserRepository>,
        denial_policy: DenialPolicy,
        identity_header: HeaderName,
    ) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let router = EventRouter::new(
            messages.clone(),
            BroadcastDispatcher::new(registry.clone()),
            denial_policy,
        );
        Self {
            messages,
            users,
            registry,
            router,
            identity_header,
            shutdown: CancellationToken::new(),
            connections: TaskTracker::new(),
        }
    }
}
