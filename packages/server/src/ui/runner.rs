//! Server bootstrap.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::{
    config::ServerConfig,
    domain::{MessageRepository, RepositoryError, UserRepository},
    infrastructure::repository::{InMemoryStore, SqliteStore},
};

use super::{router::build_router, signal::shutdown_signal, state::AppState};

/// Errors that stop the server from starting or serving
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("store initialization failed: {0}")]
    Store(#[from] RepositoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open the configured store and register seed users
async fn open_store(
    config: &ServerConfig,
) -> Result<(Arc<dyn MessageRepository>, Arc<dyn UserRepository>), ServerError> {
    let (messages, users): (Arc<dyn MessageRepository>, Arc<dyn UserRepository>) =
        match &config.database_url {
            Some(url) => {
                let store = Arc::new(SqliteStore::connect(url).await?);
                (store.clone(), store)
            }
            None => {
                tracing::info!("No database configured; using in-memory store");
                let store = Arc::new(InMemoryStore::new());
                (store.clone(), store)
            }
        };

    for user in &config.seed_users {
        users.register_user(*user).await?;
    }
    if !config.seed_users.is_empty() {
        tracing::info!("Registered {} seed user(s)", config.seed_users.len());
    }

    Ok((messages, users))
}

/// Run the server until a shutdown signal arrives
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let (messages, users) = open_store(&config).await?;
    let state = Arc::new(AppState::new(
        messages,
        users,
        config.denial_policy,
        config.identity_header.clone(),
    ));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    tracing::info!(
        "Identity header: '{}', denial policy: {:?}",
        config.identity_header,
        config.denial_policy
    );

    serve(listener, state, shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Serve until `signal` resolves, then close every WebSocket connection and wait for
/// their disconnect cleanup to finish
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    signal: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown = state.shutdown.clone();
    let connections = state.connections.clone();
    let app = build_router(state);

    // Upgraded connections are not tracked by axum's graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            shutdown.cancel();
        })
        .await?;

    connections.close();
    tracing::info!("Waiting for {} connection(s) to close", connections.len());
    connections.wait().await;
    Ok(())
}
