use crate::error::RelayError;
use axum::extract::ws::Message;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use switchboard_core::ConnectionId;
use tokio::sync::mpsc;

/// Sending side of one client's websocket.
///
/// Frames are queued on an unbounded channel that a writer task drains into
/// the socket, so `send` never waits on the network. Clones share the same
/// channel and closed flag.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Message>,
    closed: Arc<AtomicBool>,
}

impl ConnectionHandle {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self::with_id(ConnectionId::new(), tx)
    }

    fn with_id(id: ConnectionId, tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id,
            tx,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a handle together with the receiver its writer task drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn send(&self, message: Message) -> Result<(), RelayError> {
        if self.is_closed() {
            return Err(RelayError::PeerSendFailure(self.id));
        }
        self.tx
            .send(message)
            .map_err(|_| RelayError::PeerSendFailure(self.id))
    }

    /// True once `close` was called or the writer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.tx.is_closed()
    }

    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        // The writer stops after forwarding this frame.
        let _ = self.tx.send(Message::Close(None));
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

impl Hash for ConnectionHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
