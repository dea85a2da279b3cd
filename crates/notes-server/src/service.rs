//! The notes service.
//!
//! Owns the injected collaborators (store, identity verifier, clock) and
//! implements the authentication pipeline and the five note operations.
//! Each operation runs its steps in sequence and returns on the first
//! failure; nothing is retried.

use std::sync::Arc;

use notes_core::{
    Clock, DeleteResult, FolderRef, Note, NoteDraft, NoteId, NoteIdStrategy, User,
};
use notes_store::{NoteUpdate, NotesStore};

use crate::error::{ApiError, ApiResult};
use crate::identity::IdentityVerifier;

/// Fields a client supplies to create a note.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub visibility: String,
    pub folder: FolderRef,
}

/// Note operations on behalf of authenticated users.
pub struct NotesService {
    store: Arc<dyn NotesStore>,
    verifier: Arc<dyn IdentityVerifier>,
    clock: Arc<dyn Clock>,
    id_strategy: NoteIdStrategy,
}

impl NotesService {
    pub fn new(
        store: Arc<dyn NotesStore>,
        verifier: Arc<dyn IdentityVerifier>,
        clock: Arc<dyn Clock>,
        id_strategy: NoteIdStrategy,
    ) -> Self {
        Self {
            store,
            verifier,
            clock,
            id_strategy,
        }
    }

    /// Verify `token` and load the local user it belongs to.
    pub async fn authenticate(&self, token: &str) -> ApiResult<User> {
        let identity = self.verifier.verify(token).await?;

        self.store
            .find_user(&identity.uid)
            .await?
            .ok_or(ApiError::UserNotFound { uid: identity.uid })
    }

    /// Create a note in the requested folder and file it there.
    pub async fn create_note(&self, user: &User, new: NewNote) -> ApiResult<Note> {
        let draft = NoteDraft {
            title: new.title,
            visibility: new.visibility,
            folder: new.folder.resolve(user),
            timestamp: self.clock.now_millis(),
            owner: user.uid.clone(),
        };
        let id = self.id_strategy.assign(&draft);
        let note = draft.into_note(id);

        let stored = self.store.create_filed_note(&note).await?;

        tracing::info!(
            note_id = %stored.id,
            folder = %stored.folder,
            owner = %stored.owner,
            "Note created"
        );
        Ok(stored)
    }

    /// The user's notes in a folder.
    pub async fn list_notes(&self, user: &User, folder: &FolderRef) -> ApiResult<Vec<Note>> {
        let folder = folder.resolve(user);
        let notes = self.store.find_notes_in_folder(&user.uid, &folder).await?;

        tracing::info!(folder = %folder, count = notes.len(), "Listed notes");
        Ok(notes)
    }

    /// One of the user's notes, if it exists.
    pub async fn view_note(&self, user: &User, id: &NoteId) -> ApiResult<Option<Note>> {
        let note = self.store.find_note(&user.uid, id).await?;

        tracing::debug!(note_id = %id, found = note.is_some(), "Viewed note");
        Ok(note)
    }

    /// Set title and content on a note and return its previous state.
    ///
    /// Any authenticated user may update any note by id; `user` is only
    /// recorded in the log.
    pub async fn update_note(
        &self,
        user: &User,
        id: &NoteId,
        update: &NoteUpdate,
    ) -> ApiResult<Option<Note>> {
        let prev = self.store.update_note(id, update).await?;

        tracing::info!(
            note_id = %id,
            by = %user.uid,
            matched = prev.is_some(),
            "Note updated"
        );
        Ok(prev)
    }

    /// Unfile a note from `folder` and delete it.
    ///
    /// Deleting a note that does not exist succeeds with a count of zero.
    pub async fn delete_note(
        &self,
        user: &User,
        folder: &FolderRef,
        id: &NoteId,
    ) -> ApiResult<DeleteResult> {
        let folder = folder.resolve(user);
        let result = self.store.delete_filed_note(&folder, id).await?;

        if !result.acknowledged {
            return Err(ApiError::Unacknowledged);
        }

        tracing::info!(
            note_id = %id,
            folder = %folder,
            deleted = result.deleted_count,
            "Note deleted"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for NotesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesService")
            .field("id_strategy", &self.id_strategy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use notes_core::{FixedClock, FolderId, derive_note_id};
    use notes_store::{FolderStore, MemoryStore};

    use crate::identity::{VerifiedIdentity, VerifyError};

    const T: i64 = 1_700_000_000_000;

    /// Accepts tokens of the form `token-<uid>`.
    struct PrefixVerifier;

    #[async_trait]
    impl IdentityVerifier for PrefixVerifier {
        async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
            token
                .strip_prefix("token-")
                .map(|uid| VerifiedIdentity { uid: uid.into() })
                .ok_or_else(|| VerifyError::InvalidToken(token.into()))
        }
    }

    async fn service() -> (NotesService, Arc<MemoryStore>, User) {
        let store = Arc::new(MemoryStore::new());
        let user = store.insert_user_with_root("u1", "F1").await;
        let service = NotesService::new(
            store.clone(),
            Arc::new(PrefixVerifier),
            Arc::new(FixedClock(T)),
            NoteIdStrategy::ContentHash,
        );
        (service, store, user)
    }

    fn new_note(folder: &str) -> NewNote {
        NewNote {
            title: "A".into(),
            visibility: "private".into(),
            folder: FolderRef::parse(folder),
        }
    }

    #[tokio::test]
    async fn test_authenticate_resolves_user() {
        let (service, _, user) = service().await;
        assert_eq!(service.authenticate("token-u1").await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_uid() {
        let (service, _, _) = service().await;
        let err = service.authenticate("token-ghost").await.unwrap_err();
        assert!(matches!(err, ApiError::UserNotFound { ref uid } if uid == "ghost"));
    }

    #[tokio::test]
    async fn test_authenticate_bad_token() {
        let (service, _, _) = service().await;
        let err = service.authenticate("garbage").await.unwrap_err();
        assert!(matches!(err, ApiError::AuthFailure(_)));
    }

    #[tokio::test]
    async fn test_create_in_root_resolves_sentinel() {
        let (service, store, user) = service().await;

        let note = service.create_note(&user, new_note("root")).await.unwrap();

        let expected_id = derive_note_id(&NoteDraft {
            title: "A".into(),
            visibility: "private".into(),
            folder: FolderId::new("F1"),
            timestamp: T,
            owner: "u1".into(),
        });
        assert_eq!(note.id, expected_id);
        assert_eq!(note.folder, FolderId::new("F1"));
        assert_eq!(note.timestamp, T);

        let folder = store.get_folder(&FolderId::new("F1")).await.unwrap().unwrap();
        assert_eq!(folder.notes, vec![expected_id]);
    }

    #[tokio::test]
    async fn test_same_instant_collides() {
        let (service, _, user) = service().await;
        service.create_note(&user, new_note("root")).await.unwrap();

        let err = service.create_note(&user, new_note("root")).await.unwrap_err();
        assert!(matches!(err, ApiError::Store(_)));
    }

    #[tokio::test]
    async fn test_random_ids_do_not_collide() {
        let store = Arc::new(MemoryStore::new());
        let user = store.insert_user_with_root("u1", "F1").await;
        let service = NotesService::new(
            store,
            Arc::new(PrefixVerifier),
            Arc::new(FixedClock(T)),
            NoteIdStrategy::Random,
        );

        let a = service.create_note(&user, new_note("root")).await.unwrap();
        let b = service.create_note(&user, new_note("root")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_delete_resolves_root_sentinel() {
        let (service, store, user) = service().await;
        let note = service.create_note(&user, new_note("root")).await.unwrap();

        let result = service
            .delete_note(&user, &FolderRef::Root, &note.id)
            .await
            .unwrap();
        assert_eq!(result.deleted_count, 1);

        let folder = store.get_folder(&FolderId::new("F1")).await.unwrap().unwrap();
        assert!(folder.notes.is_empty());
    }
}
