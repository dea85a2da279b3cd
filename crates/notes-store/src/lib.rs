//! notes-store: Storage layer for the Notes Service
//!
//! This crate provides:
//! - Store ports scoped to each entity ([`UserStore`], [`FolderStore`],
//!   [`NoteStore`]) and the combined [`NotesStore`]
//! - A PostgreSQL adapter ([`PgStore`]) built on sqlx
//! - An in-memory adapter ([`MemoryStore`]) for tests and local runs
//! - Bootstrap schema management
//!
//! # Usage
//!
//! ```rust,ignore
//! use notes_store::{NotesStore, PgStore, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let store = PgStore::connect(config).await?;
//!
//! let notes = store.find_notes_in_folder("uid-1", &folder_id).await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod ports;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use ports::{FolderStore, NoteStore, NoteUpdate, NotesStore, UserStore};
pub use store::{PgStore, StoreConfig};

// Re-export notes-core for downstream crates
pub use notes_core;
