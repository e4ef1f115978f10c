use super::room::Room;
use crate::error::RelayError;
use crate::transport::ConnectionHandle;
use axum::extract::ws::Message;
use std::collections::HashMap;
use std::sync::Arc;
use switchboard_core::{ConnectionId, RoomId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room: RoomId,
    /// Member count of `room` after the join.
    pub clients: usize,
    /// Room the connection was implicitly moved out of.
    pub previous: Option<RoomId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub room: RoomId,
    /// Members left behind. Zero means the room was deleted.
    pub remaining: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    /// Peers whose channel was already closed; not attempted.
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReapReport {
    pub pruned_connections: Vec<ConnectionId>,
    pub removed_rooms: Vec<RoomId>,
}

impl ReapReport {
    pub fn is_empty(&self) -> bool {
        self.pruned_connections.is_empty() && self.removed_rooms.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub rooms: usize,
    pub connections: usize,
}

/// Both indices live behind one lock so they can never be observed out of
/// step: a connection is in `memberships` exactly when it is a member of the
/// room it points to.
#[derive(Default)]
struct RegistryInner {
    rooms: HashMap<RoomId, Room>,
    memberships: HashMap<ConnectionId, RoomId>,
}

impl RegistryInner {
    fn detach(&mut self, id: ConnectionId) -> Option<LeaveOutcome> {
        let room_id = self.memberships.remove(&id)?;

        let remaining = match self.rooms.get_mut(&room_id) {
            Some(room) => {
                room.remove(id);
                room.len()
            }
            None => {
                warn!("Connection {} pointed at missing room '{}'", id, room_id);
                0
            }
        };

        if remaining == 0 {
            if let Some(room) = self.rooms.remove(&room_id) {
                info!("Room '{}' is empty, removed after {:?}", room.id(), room.age());
            }
        }

        Some(LeaveOutcome {
            room: room_id,
            remaining,
        })
    }
}

/// Process-wide map of rooms and the reverse index from connection to room.
///
/// Every operation takes the lock once and finishes its whole mutation
/// before releasing it. Nothing awaits while the lock is held except the
/// lock itself, since sends only enqueue.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `connection` to `room`, moving it out of any other room first.
    pub async fn join(
        &self,
        connection: &ConnectionHandle,
        room: &str,
    ) -> Result<JoinOutcome, RelayError> {
        let room_id = RoomId::parse(room).map_err(|_| RelayError::InvalidRoom)?;
        let id = connection.id();

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let current = inner.memberships.get(&id).cloned();
        let previous = match current {
            Some(current) if current == room_id => None,
            Some(_) => inner.detach(id).map(|left| left.room),
            None => None,
        };

        let room = inner.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!("Room '{}' created", room_id);
            Room::new(room_id.clone())
        });
        room.insert(connection.clone());
        let clients = room.len();

        inner.memberships.insert(id, room_id.clone());

        info!("Connection {} joined room '{}' ({} clients)", id, room_id, clients);

        Ok(JoinOutcome {
            room: room_id,
            clients,
            previous,
        })
    }

    /// Unbinds `connection` from its room. `None` if it was not in one.
    pub async fn leave(&self, connection: ConnectionId) -> Option<LeaveOutcome> {
        let outcome = self.inner.lock().await.detach(connection);

        if let Some(left) = &outcome {
            info!(
                "Connection {} left room '{}' ({} remaining)",
                connection, left.room, left.remaining
            );
        }
        outcome
    }

    /// Queues `message` for every other open member of the sender's room.
    ///
    /// Closed peers are skipped and a failed peer is logged; both stay in the
    /// room until their own disconnect path or the reaper removes them.
    pub async fn broadcast(
        &self,
        sender: ConnectionId,
        message: Message,
    ) -> Result<BroadcastReport, RelayError> {
        let inner = self.inner.lock().await;

        let room_id = inner.memberships.get(&sender).ok_or(RelayError::NotInRoom)?;
        let room = inner.rooms.get(room_id).ok_or(RelayError::NotInRoom)?;

        let mut report = BroadcastReport::default();
        for peer in room.members().filter(|peer| peer.id() != sender) {
            if peer.is_closed() {
                report.skipped += 1;
                continue;
            }
            match peer.send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!("Relay in room '{}' skipped peer: {}", room_id, e);
                    report.failed += 1;
                }
            }
        }

        debug!(
            "Relayed frame from {} in room '{}' to {} peers ({} closed, {} failed)",
            sender, room_id, report.delivered, report.skipped, report.failed
        );
        Ok(report)
    }

    /// Prunes closed members from every room, then deletes rooms left empty.
    pub async fn reap_empty_rooms(&self) -> ReapReport {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let mut report = ReapReport::default();

        for room in inner.rooms.values_mut() {
            for id in room.prune_closed() {
                inner.memberships.remove(&id);
                debug!("Pruned closed connection {} from room '{}'", id, room.id());
                report.pruned_connections.push(id);
            }
        }

        inner.rooms.retain(|room_id, room| {
            if !room.is_empty() {
                return true;
            }
            info!("Reaped empty room '{}' (age {:?})", room_id, room.age());
            report.removed_rooms.push(room_id.clone());
            false
        });

        report
    }

    pub async fn stats(&self) -> RegistryStats {
        let inner = self.inner.lock().await;
        RegistryStats {
            rooms: inner.rooms.len(),
            connections: inner.memberships.len(),
        }
    }

    pub async fn room_size(&self, room: &RoomId) -> Option<usize> {
        self.inner.lock().await.rooms.get(room).map(Room::len)
    }

    pub async fn room_of(&self, connection: ConnectionId) -> Option<RoomId> {
        self.inner.lock().await.memberships.get(&connection).cloned()
    }

    pub async fn contains_room(&self, room: &RoomId) -> bool {
        self.inner.lock().await.rooms.contains_key(room)
    }
}
