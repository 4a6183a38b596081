//! One-to-one WebSocket chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pairchat-server -- --seed-users 1,2,3
//! ```

use clap::Parser;
use pairchat_server::ServerConfig;
use pairchat_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = pairchat_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
