//! notes-core: Core types for the Notes Service
//!
//! This crate provides:
//! - Domain types: [`User`], [`Folder`], [`Note`] and their identifiers
//! - The `"root"` folder sentinel ([`FolderRef`])
//! - Note id derivation ([`NoteIdStrategy`], [`derive_note_id`])
//! - A clock abstraction for creation timestamps ([`Clock`])

pub mod clock;
pub mod note_id;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use note_id::{derive_note_id, NoteIdStrategy, UnknownStrategy};
pub use types::*;
