//! notes-server: HTTP API server for the Notes Service
//!
//! This crate provides:
//! - Note CRUD endpoints (create, list, view, update, delete)
//! - Bearer-token authentication through a pluggable [`IdentityVerifier`]
//! - Resolution of the verified identity to a local user record
//! - Uniform `{ "reason": ... }` JSON error responses
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//!
//! Handlers delegate to [`NotesService`], which holds the injected store,
//! verifier and clock.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use notes_server::{routes, AppState, NotesService, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let service = NotesService::new(store, verifier, Arc::new(SystemClock), config.note_id_strategy);
//! let app = routes::build_router(AppState::new(service, config));
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod identity;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod state;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use identity::{IdentityVerifier, VerifiedIdentity, VerifyError};
pub use service::NotesService;
pub use state::AppState;

// Re-export dependent crates
pub use notes_core;
pub use notes_store;
