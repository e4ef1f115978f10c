use super::message_router::MessageRouter;
use crate::error::RelayError;
use crate::room::RoomRegistry;
use crate::transport::ConnectionHandle;
use axum::extract::ws::Message;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt;
use std::time::Duration;
use tokio::time::{self, Instant, Interval};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnecting,
    Closed,
}

/// Registry binding of one live connection.
///
/// `close` is the normal way out. A session dropped before reaching `Closed`
/// (aborted task, cancelled future, panic) still unbinds itself: the handle
/// is marked closed and the leave is handed to the runtime.
pub struct ConnectionSession {
    handle: ConnectionHandle,
    registry: RoomRegistry,
    state: ConnectionState,
}

impl ConnectionSession {
    pub fn open(handle: ConnectionHandle, registry: RoomRegistry) -> Self {
        Self {
            handle,
            registry,
            state: ConnectionState::Connected,
        }
    }

    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub async fn close(mut self) {
        self.state = ConnectionState::Disconnecting;

        let id = self.handle.id();
        if let Some(left) = self.registry.leave(id).await {
            debug!("Connection {} unbound from room '{}'", id, left.room);
        }
        self.handle.close();

        self.state = ConnectionState::Closed;
    }
}

impl Drop for ConnectionSession {
    fn drop(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }

        self.handle.close();
        let id = self.handle.id();
        let registry = self.registry.clone();

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                warn!("Connection {} dropped while {:?}, scheduling cleanup", id, self.state);
                runtime.spawn(async move {
                    registry.leave(id).await;
                });
            }
            Err(_) => warn!("No runtime to clean up {}; leaving it to the reaper", id),
        }
    }
}

/// Why a receive loop stopped.
#[derive(Debug)]
pub enum LoopExit {
    ClosedByPeer,
    Fault(RelayError),
}

/// Drives one connection from `Connected` to `Closed`.
///
/// Every text frame goes through the router in arrival order. The loop ends
/// on a close frame, end of stream, a transport error, or a missed heartbeat;
/// cleanup runs on every one of those paths.
pub async fn run_connection<S, E>(
    mut stream: S,
    session: ConnectionSession,
    router: &MessageRouter,
    heartbeat: Option<Duration>,
) -> LoopExit
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    let exit = receive_loop(&mut stream, &session, router, heartbeat).await;

    match &exit {
        LoopExit::ClosedByPeer => info!("Connection {} closed", session.handle().id()),
        LoopExit::Fault(e) => warn!("Connection {} failed: {}", session.handle().id(), e),
    }

    session.close().await;
    exit
}

async fn receive_loop<S, E>(
    stream: &mut S,
    session: &ConnectionSession,
    router: &MessageRouter,
    heartbeat: Option<Duration>,
) -> LoopExit
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    let handle = session.handle();
    let mut heartbeat = heartbeat.map(|period| time::interval_at(Instant::now() + period, period));
    let mut awaiting_pong = false;

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    router.route(handle, text).await;
                }
                Some(Ok(Message::Binary(data))) => {
                    debug!("Ignoring {} byte binary frame from {}", data.len(), handle.id());
                }
                Some(Ok(Message::Pong(_))) => awaiting_pong = false,
                // pings are answered by the websocket layer
                Some(Ok(Message::Ping(_))) => {}
                Some(Ok(Message::Close(_))) | None => return LoopExit::ClosedByPeer,
                Some(Err(e)) => {
                    return LoopExit::Fault(RelayError::TransportFault(e.to_string()));
                }
            },

            _ = next_tick(&mut heartbeat) => {
                if awaiting_pong {
                    return LoopExit::Fault(RelayError::TransportFault(
                        "heartbeat timed out".to_owned(),
                    ));
                }
                if let Err(e) = handle.send(Message::Ping(Bytes::new())) {
                    return LoopExit::Fault(RelayError::TransportFault(e.to_string()));
                }
                awaiting_pong = true;
            }
        }
    }
}

async fn next_tick(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
