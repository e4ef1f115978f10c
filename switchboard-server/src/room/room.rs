use crate::transport::ConnectionHandle;
use std::collections::HashMap;
use std::time::Duration;
use switchboard_core::{ConnectionId, RoomId};
use tokio::time::Instant;

/// Members of one room. Only ever touched under the registry lock.
pub(crate) struct Room {
    id: RoomId,
    members: HashMap<ConnectionId, ConnectionHandle>,
    created_at: Instant,
}

impl Room {
    pub(crate) fn new(id: RoomId) -> Self {
        Self {
            id,
            members: HashMap::new(),
            created_at: Instant::now(),
        }
    }

    pub(crate) fn id(&self) -> &RoomId {
        &self.id
    }

    pub(crate) fn insert(&mut self, connection: ConnectionHandle) {
        self.members.insert(connection.id(), connection);
    }

    pub(crate) fn remove(&mut self, id: ConnectionId) -> Option<ConnectionHandle> {
        self.members.remove(&id)
    }

    pub(crate) fn members(&self) -> impl Iterator<Item = &ConnectionHandle> {
        self.members.values()
    }

    /// Drops members whose channel is closed and returns their ids.
    pub(crate) fn prune_closed(&mut self) -> Vec<ConnectionId> {
        let closed: Vec<ConnectionId> = self
            .members
            .values()
            .filter(|member| member.is_closed())
            .map(ConnectionHandle::id)
            .collect();

        for id in &closed {
            self.members.remove(id);
        }
        closed
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}
