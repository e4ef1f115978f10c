mod room;
mod room_reaper;
mod room_registry;

pub use room_reaper::*;
pub use room_registry::*;
