//! Test fixtures: an in-process server on an ephemeral port and a WebSocket client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::http::HeaderName;
use futures_util::{SinkExt, StreamExt};
use pairchat_server::{
    AppState, serve,
    domain::{UserId, UserRepository},
    infrastructure::repository::InMemoryStore,
    usecase::DenialPolicy,
};
use serde_json::Value;
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream,
    tungstenite::{Message, client::IntoClientRequest, http::HeaderValue},
};

pub const IDENTITY_HEADER: &str = "x-user-id";

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    addr: SocketAddr,
    pub store: Arc<InMemoryStore>,
    handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a server whose store knows `users`
    pub async fn start(users: &[i64]) -> Self {
        Self::start_with_policy(users, DenialPolicy::Silent).await
    }

    pub async fn start_with_policy(users: &[i64], policy: DenialPolicy) -> Self {
        let store = Arc::new(InMemoryStore::with_users(
            users.iter().map(|id| UserId::new(*id).expect("valid user id")),
        ));
        let state = Arc::new(AppState::new(
            store.clone(),
            store.clone(),
            policy,
            HeaderName::from_static(IDENTITY_HEADER),
        ));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            serve(listener, state, async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server failed");
        });
        Self {
            addr,
            store,
            handle,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Trigger graceful shutdown and wait until the server has returned
    pub async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), &mut self.handle)
            .await
            .expect("server did not shut down")
            .expect("server task failed");
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, peer: &str) -> String {
        format!("ws://{}/ws/chat/{}", self.addr, peer)
    }

    /// Open a WebSocket as `user` (unauthenticated when `None`) towards `peer`
    pub async fn connect(&self, user: Option<i64>, peer: i64) -> WsClient {
        let mut request = self
            .ws_url(&peer.to_string())
            .into_client_request()
            .expect("Failed to build request");
        if let Some(user) = user {
            request.headers_mut().insert(
                IDENTITY_HEADER,
                HeaderValue::from_str(&user.to_string()).expect("valid header"),
            );
        }
        let (ws, _) = tokio_tungstenite::connect_async(request)
            .await
            .expect("Failed to connect");
        ws
    }

    /// Connect `user` to `peer` and wait until the room has `members` connections
    /// and the user is marked online
    pub async fn join(&self, user: i64, peer: i64, members: usize) -> WsClient {
        let ws = self.connect(Some(user), peer).await;
        let room = format!("chat_{}_{}", user.min(peer), user.max(peer));
        self.wait_for_members(&room, members).await;
        self.wait_for_online(user).await;
        ws
    }

    /// Poll the store until `user` is online
    pub async fn wait_for_online(&self, user: i64) {
        let user = UserId::new(user).expect("valid user id");
        for _ in 0..100 {
            if let Ok(Some(found)) = self.store.find_user(user).await
                && found.is_online
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("user {user} never came online");
    }

    /// Poll `/api/rooms` until `room` has exactly `members` connections
    pub async fn wait_for_members(&self, room: &str, members: usize) {
        let client = reqwest::Client::new();
        for _ in 0..100 {
            let rooms: Value = client
                .get(format!("{}/api/rooms", self.base_url()))
                .send()
                .await
                .expect("Failed to send request")
                .json()
                .await
                .expect("Failed to parse JSON");
            let current = rooms
                .as_array()
                .and_then(|rooms| rooms.iter().find(|r| r["room_id"] == room))
                .and_then(|r| r["members"].as_u64())
                .unwrap_or(0);
            if current == members as u64 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("room '{room}' never reached {members} member(s)");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn send_json(ws: &mut WsClient, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send");
}

pub async fn send_text(ws: &mut WsClient, text: &str) {
    ws.send(Message::Text(text.into()))
        .await
        .expect("Failed to send");
}

/// Next text frame as JSON (fails after 2 seconds)
pub async fn recv_json(ws: &mut WsClient) -> Value {
    let result = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str::<Value>(text.as_str()).expect("invalid JSON");
                }
                Some(Ok(_)) => continue,
                other => panic!("connection ended: {other:?}"),
            }
        }
    })
    .await;
    result.expect("timed out waiting for a message")
}

/// Assert that no text frame arrives for a short while
pub async fn assert_no_message(ws: &mut WsClient) {
    let result = tokio::time::timeout(Duration::from_millis(200), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return text.to_string(),
                Some(Ok(_)) => continue,
                other => panic!("connection ended: {other:?}"),
            }
        }
    })
    .await;
    if let Ok(text) = result {
        panic!("unexpected message: {text}");
    }
}
