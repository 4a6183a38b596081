//! Logger setup shared by every binary.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies to this workspace's
/// crates and `warn` to everything else.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,pairchat_server={default_level},pairchat_shared={default_level},{}={default_level},tower_http={default_level}",
            bin_name.replace('-', "_")
        ))
    });

    // try_init: tests may call this more than once
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .try_init();
}
