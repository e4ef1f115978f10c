use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 9090;
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_REAPER_INTERVAL: Duration = Duration::from_secs(300);

/// Runtime parameters for the relay.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Ping period for each websocket. `None` disables keepalive.
    pub heartbeat_interval: Option<Duration>,
    pub reaper_interval: Duration,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            heartbeat_interval: Some(DEFAULT_HEARTBEAT_INTERVAL),
            reaper_interval: DEFAULT_REAPER_INTERVAL,
        }
    }
}
