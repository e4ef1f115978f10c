mod connection_lifecycle;
mod message_router;
mod ws_handler;

pub use connection_lifecycle::*;
pub use message_router::*;
pub use ws_handler::*;
