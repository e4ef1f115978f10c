use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The routing-relevant part of a client frame.
///
/// Every other field of the frame is opaque payload and stays in the raw text
/// that gets relayed, so it is not captured here. `room` is kept untyped
/// because only `join` gives it meaning.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InboundEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub room: Option<Value>,
}

impl InboundEnvelope {
    /// Parses a text frame. Anything that is not a JSON object carrying a
    /// string `type` is rejected.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_str(text)?;
        serde_json::from_value(Value::Object(object))
    }

    /// The `room` field when it is a string.
    pub fn room_name(&self) -> Option<&str> {
        self.room.as_ref().and_then(Value::as_str)
    }

    pub fn message_kind(&self) -> MessageKind {
        MessageKind::from(self.kind.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Join,
    Offer,
    Answer,
    IceCandidate,
    Unknown(String),
}

impl MessageKind {
    /// Kinds relayed verbatim to the other members of the sender's room.
    pub fn is_signaling(&self) -> bool {
        matches!(self, Self::Offer | Self::Answer | Self::IceCandidate)
    }
}

impl From<&str> for MessageKind {
    fn from(kind: &str) -> Self {
        match kind {
            "join" => Self::Join,
            "offer" => Self::Offer,
            "answer" => Self::Answer,
            "ice-candidate" => Self::IceCandidate,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

/// Frames emitted by the server itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    Joined { room: String, clients: usize },
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
