//! HTTP/WebSocket server.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::usecase::{ReapEmptyRoomsUseCase, SeedDefaultRoomsUseCase};

use super::{
    handler::{create_room, get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Room synchronization server
///
/// Serves the WebSocket endpoint and the HTTP API, and owns the background
/// work that runs alongside them (default room seeding and the empty-room
/// reaper).
///
/// # Example
///
/// ```ignore
/// let server = atelier_server::bootstrap::build_server(&ServerConfig::default());
/// server.run("127.0.0.1".to_string(), 3001).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// SeedDefaultRoomsUseCase（起動時のデフォルトルーム作成）
    seed_default_rooms_usecase: Arc<SeedDefaultRoomsUseCase>,
    /// ReapEmptyRoomsUseCase（空ルームの定期削除）
    reap_empty_rooms_usecase: Arc<ReapEmptyRoomsUseCase>,
    reaper_interval: Duration,
    /// Cancelled on shutdown to stop the reaper and deferred empty-room checks
    shutdown: CancellationToken,
}

impl Server {
    pub fn new(
        state: AppState,
        seed_default_rooms_usecase: Arc<SeedDefaultRoomsUseCase>,
        reap_empty_rooms_usecase: Arc<ReapEmptyRoomsUseCase>,
        reaper_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            state: Arc::new(state),
            seed_default_rooms_usecase,
            reap_empty_rooms_usecase,
            reaper_interval,
            shutdown,
        }
    }

    /// Build the router with every endpoint
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms).post(create_room))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Atelier server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// Default rooms are seeded before the first connection is accepted. The
    /// reaper and any deferred empty-room checks stop when the server stops.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let seeded = self.seed_default_rooms_usecase.execute().await;
        tracing::info!(count = seeded, "Default rooms ready");

        let reaper = self
            .reap_empty_rooms_usecase
            .clone()
            .spawn(self.reaper_interval, self.shutdown.clone());

        let app = self.router();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        self.shutdown.cancel();
        if let Err(e) = reaper.await {
            tracing::warn!("Reaper task ended abnormally: {}", e);
        }

        result
    }
}
