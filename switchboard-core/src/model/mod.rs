mod connection;
mod envelope;
mod room;

pub use connection::ConnectionId;
pub use envelope::{InboundEnvelope, MessageKind, ServerMessage};
pub use room::{InvalidRoomId, RoomId};
