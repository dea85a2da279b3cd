//! In-memory store.
//!
//! Keeps users, folders and notes behind one lock, so the composite
//! operations of [`NotesStore`] apply both of their steps or neither.
//! Used by tests and by the server's `memory` backend.

use std::collections::HashMap;

use async_trait::async_trait;
use notes_core::{DeleteResult, Folder, FolderId, Note, NoteId, User};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::ports::{FolderStore, NoteStore, NoteUpdate, NotesStore, UserStore};

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<String, User>,
    folders: HashMap<FolderId, Folder>,
    /// Insertion order is the natural order of listings.
    notes: Vec<Note>,
}

impl Inner {
    fn push(&mut self, folder: &FolderId, note: &NoteId) -> bool {
        match self.folders.get_mut(folder) {
            Some(f) => {
                f.notes.push(note.clone());
                true
            }
            None => false,
        }
    }

    fn pull(&mut self, folder: &FolderId, note: &NoteId) -> bool {
        match self.folders.get_mut(folder) {
            Some(f) => {
                f.notes.retain(|n| n != note);
                true
            }
            None => false,
        }
    }

    fn insert(&mut self, note: &Note) -> StoreResult<Note> {
        if self.notes.iter().any(|n| n.id == note.id) {
            return Err(StoreError::DuplicateNote(note.id.clone()));
        }
        self.notes.push(note.clone());
        Ok(note.clone())
    }

    fn delete(&mut self, id: &NoteId) -> DeleteResult {
        let before = self.notes.len();
        if let Some(pos) = self.notes.iter().position(|n| &n.id == id) {
            self.notes.remove(pos);
        }
        DeleteResult::acknowledged((before - self.notes.len()) as u64)
    }
}

/// Store holding everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a user. Replaces any user with the same uid.
    pub async fn insert_user(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.uid.clone(), user);
    }

    /// Provision a folder. Replaces any folder with the same id.
    pub async fn insert_folder(&self, folder: Folder) {
        let mut inner = self.inner.write().await;
        inner.folders.insert(folder.id.clone(), folder);
    }

    /// Provision a user together with an empty root folder.
    pub async fn insert_user_with_root(&self, uid: &str, root: &str) -> User {
        let user = User::new(uid, root);
        let mut inner = self.inner.write().await;
        inner
            .folders
            .entry(user.root.clone())
            .or_insert_with(|| Folder::new(root));
        inner.users.insert(user.uid.clone(), user.clone());
        user
    }

    /// Number of stored notes, across all users.
    pub async fn note_count(&self) -> usize {
        self.inner.read().await.notes.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, uid: &str) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(uid).cloned())
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn get_folder(&self, id: &FolderId) -> StoreResult<Option<Folder>> {
        Ok(self.inner.read().await.folders.get(id).cloned())
    }

    async fn push_note(&self, folder: &FolderId, note: &NoteId) -> StoreResult<bool> {
        Ok(self.inner.write().await.push(folder, note))
    }

    async fn pull_note(&self, folder: &FolderId, note: &NoteId) -> StoreResult<bool> {
        Ok(self.inner.write().await.pull(folder, note))
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn insert_note(&self, note: &Note) -> StoreResult<Note> {
        self.inner.write().await.insert(note)
    }

    async fn find_notes_in_folder(
        &self,
        owner: &str,
        folder: &FolderId,
    ) -> StoreResult<Vec<Note>> {
        let inner = self.inner.read().await;
        Ok(inner
            .notes
            .iter()
            .filter(|n| n.owner == owner && &n.folder == folder)
            .cloned()
            .collect())
    }

    async fn find_note(&self, owner: &str, id: &NoteId) -> StoreResult<Option<Note>> {
        let inner = self.inner.read().await;
        Ok(inner
            .notes
            .iter()
            .find(|n| n.owner == owner && &n.id == id)
            .cloned())
    }

    async fn update_note(&self, id: &NoteId, update: &NoteUpdate) -> StoreResult<Option<Note>> {
        let mut inner = self.inner.write().await;
        let Some(note) = inner.notes.iter_mut().find(|n| &n.id == id) else {
            return Ok(None);
        };
        let prev = note.clone();
        update.apply_to(note);
        Ok(Some(prev))
    }

    async fn delete_note(&self, id: &NoteId) -> StoreResult<DeleteResult> {
        Ok(self.inner.write().await.delete(id))
    }
}

#[async_trait]
impl NotesStore for MemoryStore {
    async fn create_filed_note(&self, note: &Note) -> StoreResult<Note> {
        let mut inner = self.inner.write().await;
        if inner.notes.iter().any(|n| n.id == note.id) {
            return Err(StoreError::DuplicateNote(note.id.clone()));
        }
        inner.push(&note.folder, &note.id);
        inner.insert(note)
    }

    async fn delete_filed_note(&self, folder: &FolderId, id: &NoteId) -> StoreResult<DeleteResult> {
        let mut inner = self.inner.write().await;
        inner.pull(folder, id);
        Ok(inner.delete(id))
    }
}
