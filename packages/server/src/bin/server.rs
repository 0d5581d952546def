//! Atelier room synchronization server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin atelier-server
//! cargo run --bin atelier-server -- --host 0.0.0.0 --port 3001
//! ATELIER_EMPTY_ROOM_GRACE_SECS=5 cargo run --bin atelier-server
//! ```

use std::time::Duration;

use atelier_server::{bootstrap::build_server, config::ServerConfig};
use atelier_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "atelier-server")]
#[command(about = "Real-time room synchronization server for collaborative drawing", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "ATELIER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "ATELIER_PORT", default_value = "3001")]
    port: u16,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "ATELIER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Seconds between two sweeps of the empty-room reaper
    #[arg(long, env = "ATELIER_REAPER_INTERVAL_SECS", default_value = "1800")]
    reaper_interval_secs: u64,

    /// Seconds an emptied room is kept before it is deleted (0 deletes immediately)
    #[arg(long, env = "ATELIER_EMPTY_ROOM_GRACE_SECS", default_value = "0")]
    empty_room_grace_secs: u64,

    /// Maximum number of draw operations kept per room
    #[arg(long, env = "ATELIER_HISTORY_CAPACITY", default_value = "10000")]
    history_capacity: usize,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            reaper_interval: Duration::from_secs(self.reaper_interval_secs.max(1)),
            empty_room_grace: Duration::from_secs(self.empty_room_grace_secs),
            history_capacity: self.history_capacity,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = args.server_config();
    tracing::info!(
        reaper_interval_secs = config.reaper_interval.as_secs(),
        empty_room_grace_secs = config.empty_room_grace.as_secs(),
        history_capacity = config.history_capacity,
        "Starting Atelier server"
    );

    let server = build_server(&config);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
