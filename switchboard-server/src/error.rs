use switchboard_core::ConnectionId;
use thiserror::Error;

/// Failures that can happen while relaying for one connection.
///
/// None of these escape the connection that caused them; only
/// `TransportFault` ends the connection's task.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("join requires a non-empty room")]
    InvalidRoom,

    #[error("connection is not in a room")]
    NotInRoom,

    #[error("failed to deliver to peer {0}")]
    PeerSendFailure(ConnectionId),

    #[error("transport fault: {0}")]
    TransportFault(String),
}

impl RelayError {
    /// Text of the `error` envelope sent back to the offending client, if the
    /// failure is one the client is told about.
    pub fn client_message(&self) -> Option<&'static str> {
        match self {
            Self::MalformedEnvelope(_) => Some("invalid format"),
            Self::InvalidRoom => Some("room is required"),
            Self::NotInRoom => Some("not in a room"),
            Self::PeerSendFailure(_) | Self::TransportFault(_) => None,
        }
    }
}
