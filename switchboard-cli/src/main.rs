use anyhow::Result;
use clap::Parser;
use std::net::IpAddr;
use std::time::Duration;
use switchboard_server::{DEFAULT_PORT, ServerConfig, SignalingServer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// WebRTC signaling relay: clients join a room over a websocket and every
/// offer, answer and ICE candidate is forwarded to the rest of the room.
#[derive(Parser, Debug)]
#[command(name = "switchboard", version)]
struct Cli {
    #[arg(long, env = "SWITCHBOARD_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Websocket ping period in seconds, 0 disables it
    #[arg(long, env = "SWITCHBOARD_HEARTBEAT_SECS", default_value_t = 30)]
    heartbeat_secs: u64,

    /// Seconds between idle-room sweeps
    #[arg(long, env = "SWITCHBOARD_REAPER_SECS", default_value_t = 300)]
    reaper_secs: u64,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            heartbeat_interval: (self.heartbeat_secs > 0)
                .then(|| Duration::from_secs(self.heartbeat_secs)),
            reaper_interval: Duration::from_secs(self.reaper_secs.max(1)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config();
    info!("Starting signaling relay with {:?}", config);

    let server = SignalingServer::new(config);
    let listener = server.bind().await?;
    server.run(listener, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
