//! Route definitions for the HTTP API.

pub mod health;
pub mod notes;

use axum::Router;

use crate::state::AppState;

/// Build the complete router with all routes.
///
/// Notes routes are nested under `config.api_prefix` when one is set;
/// `/health` always stays at the root.
pub fn build_router(state: AppState) -> Router {
    let prefix = state.config().api_prefix.clone();
    let notes = if prefix.is_empty() {
        notes::routes()
    } else {
        Router::new().nest(&prefix, notes::routes())
    };

    Router::new()
        .merge(health::routes())
        .merge(notes)
        .with_state(state)
}
