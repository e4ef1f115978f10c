mod app;
mod config;
mod error;
mod room;
mod server;
mod signaling;
mod transport;

pub use app::*;
pub use config::*;
pub use error::*;
pub use room::*;
pub use server::*;
pub use signaling::*;
pub use transport::*;
