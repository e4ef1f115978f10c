use super::room_registry::RoomRegistry;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Periodic sweep that evicts rooms whose members went away without a
/// clean disconnect. Event-driven cleanup in the connection lifecycle is the
/// primary path; this only catches what it missed.
pub struct RoomReaper {
    registry: RoomRegistry,
    interval: Duration,
}

impl RoomReaper {
    pub fn new(registry: RoomRegistry, interval: Duration) -> Self {
        Self { registry, interval }
    }

    pub async fn run(self) {
        info!("Room reaper started (every {:?})", self.interval);

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let report = self.registry.reap_empty_rooms().await;
            if report.is_empty() {
                debug!("Reaper pass found nothing to evict");
            } else {
                info!(
                    "Reaper pruned {} closed connections and removed {} rooms",
                    report.pruned_connections.len(),
                    report.removed_rooms.len()
                );
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
