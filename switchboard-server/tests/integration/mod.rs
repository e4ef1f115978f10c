pub mod connection_tests;

use switchboard_server::{MessageRouter, RoomRegistry};
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_router() -> MessageRouter {
    MessageRouter::new(RoomRegistry::new())
}
