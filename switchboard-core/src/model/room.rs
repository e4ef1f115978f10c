use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("room identifier must not be empty")]
pub struct InvalidRoomId;

/// Client-supplied room name. Never empty.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RoomId(String);

impl RoomId {
    pub fn parse(raw: &str) -> Result<Self, InvalidRoomId> {
        if raw.is_empty() {
            return Err(InvalidRoomId);
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
