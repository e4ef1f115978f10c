use crate::app::{AppState, build_router};
use crate::config::ServerConfig;
use crate::room::RoomReaper;
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// The relay: registry, reaper and HTTP surface wired together.
pub struct SignalingServer {
    state: Arc<AppState>,
}

impl SignalingServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.state.config.socket_addr();
        TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))
    }

    /// Serves until `shutdown` resolves. The reaper lives exactly as long.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let reaper = RoomReaper::new(
            self.state.registry.clone(),
            self.state.config.reaper_interval,
        )
        .spawn();

        let addr = listener.local_addr().context("Listener has no local address")?;
        info!("Signaling server listening on http://{}", addr);

        let app = build_router(self.state.clone());
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error");

        reaper.abort();
        info!("Signaling server stopped");
        served
    }
}
