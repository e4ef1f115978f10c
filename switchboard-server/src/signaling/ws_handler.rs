use super::connection_lifecycle::{ConnectionSession, run_connection};
use crate::app::AppState;
use crate::transport::ConnectionHandle;
use axum::extract::State;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{Message, WebSocket};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How long the writer may keep flushing after the reader has finished.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, receiver) = socket.split();
    let (handle, mut rx) = ConnectionHandle::channel();
    let connection_id = handle.id();

    info!("New WebSocket connection: {}", connection_id);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sender.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let session = ConnectionSession::open(handle, state.registry.clone());
        let router = state.router.clone();
        let heartbeat = state.config.heartbeat_interval;

        async move {
            run_connection(receiver, session, &router, heartbeat).await;
        }
    });

    tokio::select! {
        // aborting the reader drops its session, which unbinds the connection
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => {
            if tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task).await.is_err() {
                send_task.abort();
            }
        }
    };

    info!("WebSocket disconnected: {}", connection_id);
}
