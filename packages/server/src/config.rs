//! Command-line / environment configuration.

use std::str::FromStr;

use axum::http::HeaderName;
use clap::Parser;

use crate::{domain::UserId, usecase::DenialPolicy};

/// Pairchat server configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "pairchat-server", version, about = "One-to-one WebSocket chat server")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "PAIRCHAT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "PAIRCHAT_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database URL (e.g. `sqlite://pairchat.db`); in-memory store when unset
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Request header carrying the authenticated user id
    #[arg(
        long,
        env = "PAIRCHAT_IDENTITY_HEADER",
        default_value = "x-user-id",
        value_parser = parse_header_name
    )]
    pub identity_header: HeaderName,

    /// Comma separated user ids to register at startup
    #[arg(long, env = "PAIRCHAT_SEED_USERS", value_delimiter = ',')]
    pub seed_users: Vec<UserId>,

    /// What the requester sees when an edit/delete of someone else's message is refused
    #[arg(
        long,
        env = "PAIRCHAT_DENIAL_POLICY",
        value_enum,
        default_value_t = DenialPolicy::Silent
    )]
    pub denial_policy: DenialPolicy,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "PAIRCHAT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

fn parse_header_name(value: &str) -> Result<HeaderName, String> {
    HeaderName::from_str(&value.to_ascii_lowercase()).map_err(|e| e.to_string())
}
