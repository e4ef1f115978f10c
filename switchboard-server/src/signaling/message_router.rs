use crate::error::RelayError;
use crate::room::{BroadcastReport, JoinOutcome, RoomRegistry};
use crate::transport::ConnectionHandle;
use axum::extract::ws::{Message, Utf8Bytes};
use switchboard_core::{InboundEnvelope, MessageKind, ServerMessage};
use tracing::{debug, error, warn};

/// What the router did with one inbound frame.
#[derive(Debug)]
pub enum RouteOutcome {
    Joined(JoinOutcome),
    Relayed(BroadcastReport),
    Ignored,
    /// The sender was told about the failure with an `error` envelope.
    Rejected(RelayError),
}

/// Turns inbound text frames into registry operations.
///
/// Signaling frames are relayed as the exact bytes received; only `type`
/// (and `room` on join) are ever looked at.
#[derive(Clone)]
pub struct MessageRouter {
    registry: RoomRegistry,
}

impl MessageRouter {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub async fn route(&self, sender: &ConnectionHandle, frame: Utf8Bytes) -> RouteOutcome {
        match self.dispatch(sender, frame).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Rejected frame from {}: {}", sender.id(), e);
                if let Some(text) = e.client_message() {
                    reply(sender, &ServerMessage::error(text));
                }
                RouteOutcome::Rejected(e)
            }
        }
    }

    async fn dispatch(
        &self,
        sender: &ConnectionHandle,
        frame: Utf8Bytes,
    ) -> Result<RouteOutcome, RelayError> {
        let envelope =
            InboundEnvelope::from_json(frame.as_str()).map_err(RelayError::MalformedEnvelope)?;

        match envelope.message_kind() {
            MessageKind::Join => {
                // a missing or non-string room is the same as an empty one
                let room = envelope.room_name().unwrap_or_default();
                let joined = self.registry.join(sender, room).await?;

                reply(
                    sender,
                    &ServerMessage::Joined {
                        room: joined.room.to_string(),
                        clients: joined.clients,
                    },
                );
                Ok(RouteOutcome::Joined(joined))
            }

            MessageKind::Offer | MessageKind::Answer | MessageKind::IceCandidate => {
                debug!("Relaying '{}' from {}", envelope.kind, sender.id());
                let report = self
                    .registry
                    .broadcast(sender.id(), Message::Text(frame))
                    .await?;
                Ok(RouteOutcome::Relayed(report))
            }

            MessageKind::Unknown(kind) => {
                warn!("Unknown message type '{}' from {}", kind, sender.id());
                Ok(RouteOutcome::Ignored)
            }
        }
    }
}

fn reply(connection: &ConnectionHandle, message: &ServerMessage) {
    match message.to_json() {
        Ok(json) => {
            if let Err(e) = connection.send(Message::text(json)) {
                debug!("Reply to {} dropped: {}", connection.id(), e);
            }
        }
        Err(e) => error!("Failed to serialize server message: {}", e),
    }
}
