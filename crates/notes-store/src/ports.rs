//! Store ports.
//!
//! Each entity gets its own trait so handlers depend only on the
//! operations they use. [`NotesStore`] bundles the three and adds the two
//! operations that touch a folder and a note together.
//!
//! All traits are object safe; the server holds an `Arc<dyn NotesStore>`.

use async_trait::async_trait;
use notes_core::{DeleteResult, Folder, FolderId, Note, NoteId, User};

use crate::error::StoreResult;

/// Fields an update may set. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteUpdate {
    /// Apply this update to `note` in place.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            note.content = Some(content.clone());
        }
    }
}

/// Read-only access to the user directory.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by external uid.
    async fn find_user(&self, uid: &str) -> StoreResult<Option<User>>;
}

/// Folder documents.
#[async_trait]
pub trait FolderStore: Send + Sync {
    /// Fetch a folder by id.
    async fn get_folder(&self, id: &FolderId) -> StoreResult<Option<Folder>>;

    /// Append `note` to the folder's list. Returns whether a folder matched;
    /// a missing folder is not an error.
    async fn push_note(&self, folder: &FolderId, note: &NoteId) -> StoreResult<bool>;

    /// Remove every occurrence of `note` from the folder's list. Returns
    /// whether a folder matched.
    async fn pull_note(&self, folder: &FolderId, note: &NoteId) -> StoreResult<bool>;
}

/// Note documents.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Insert a new note. Fails with `DuplicateNote` if the id is taken.
    async fn insert_note(&self, note: &Note) -> StoreResult<Note>;

    /// All notes owned by `owner` in `folder`, in insertion order.
    async fn find_notes_in_folder(&self, owner: &str, folder: &FolderId)
    -> StoreResult<Vec<Note>>;

    /// The note with this id, if `owner` owns it.
    async fn find_note(&self, owner: &str, id: &NoteId) -> StoreResult<Option<Note>>;

    /// Apply `update` to the note with this id and return the note as it
    /// was before the update. `None` when nothing matched.
    async fn update_note(&self, id: &NoteId, update: &NoteUpdate) -> StoreResult<Option<Note>>;

    /// Delete the note with this id.
    async fn delete_note(&self, id: &NoteId) -> StoreResult<DeleteResult>;
}

/// Everything the notes service needs from storage.
///
/// The provided implementations of the composite operations run their two
/// steps one after the other. Adapters that can make them atomic override
/// them.
#[async_trait]
pub trait NotesStore: UserStore + FolderStore + NoteStore {
    /// File `note.id` in `note.folder` and insert the note.
    async fn create_filed_note(&self, note: &Note) -> StoreResult<Note> {
        self.push_note(&note.folder, &note.id).await?;
        self.insert_note(note).await
    }

    /// Remove `id` from `folder` and delete the note.
    async fn delete_filed_note(&self, folder: &FolderId, id: &NoteId) -> StoreResult<DeleteResult> {
        self.pull_note(folder, id).await?;
        self.delete_note(id).await
    }
}
