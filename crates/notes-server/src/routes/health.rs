//! Liveness endpoint. Unauthenticated.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::config::StoreBackend;
use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Configured storage backend.
    pub store: &'static str,
    /// How new notes get their ids.
    pub note_ids: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.config();
    Json(HealthResponse {
        status: "ok",
        store: match config.store_backend {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        },
        note_ids: config.note_id_strategy.to_string(),
    })
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
