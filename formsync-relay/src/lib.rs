//! Relay hub and HTTP API for formsync announcements.
//!
//! Processes that cannot share memory connect here with
//! `formsync_channel::SocketTransport`; the hub forwards each announcement
//! to the other connections on the same channel.

pub mod hub;
mod server;

pub use hub::{ChannelStats, Hub, PeerId, PEER_QUEUE_CAPACITY};
pub use server::serve;

use axum::{extract::State, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

async fn channels_handler(State(hub): State<Arc<Hub>>) -> Json<Vec<ChannelStats>> {
    Json(hub.stats())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Build the HTTP API router over the given hub.
pub fn build_router(hub: Arc<Hub>) -> Router {
    Router::new()
        .route("/api/v1/channels", get(channels_handler))
        .route("/api/v1/health", get(health_handler))
        .with_state(hub)
}
