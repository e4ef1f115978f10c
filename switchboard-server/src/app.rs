use crate::config::ServerConfig;
use crate::room::RoomRegistry;
use crate::signaling::{MessageRouter, ws_handler};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared by every request handler.
pub struct AppState {
    pub registry: RoomRegistry,
    pub router: MessageRouter,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let registry = RoomRegistry::new();
        Self {
            router: MessageRouter::new(registry.clone()),
            registry,
            config,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub rooms: usize,
    pub total_clients: usize,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    let stats = state.registry.stats().await;

    Json(HealthReport {
        status: "healthy".to_owned(),
        rooms: stats.rooms,
        total_clients: stats.connections,
    })
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}
