//! Database models for the storage layer.
//!
//! These types map directly to database rows and are converted into the
//! domain types of notes-core at the store boundary.

use notes_core::{Folder, FolderId, Note, NoteId, User};
use sqlx::FromRow;

/// Database row for the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub uid: String,
    pub root: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            uid: row.uid,
            root: FolderId(row.root),
        }
    }
}

/// Database row for the `folders` table.
#[derive(Debug, Clone, FromRow)]
pub struct FolderRow {
    pub id: String,
    pub notes: Vec<String>,
}

impl From<FolderRow> for Folder {
    fn from(row: FolderRow) -> Self {
        Self {
            id: FolderId(row.id),
            notes: row.notes.into_iter().map(NoteId).collect(),
        }
    }
}

/// Database row for the `notes` table.
///
/// `seq` is an ordering column and is not selected.
#[derive(Debug, Clone, FromRow)]
pub struct NoteRow {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub visibility: String,
    pub folder: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_ms: i64,
    pub content: Option<String>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: NoteId(row.id),
            owner: row.owner,
            title: row.title,
            visibility: row.visibility,
            folder: FolderId(row.folder),
            timestamp: row.created_ms,
            content: row.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_row_into_note() {
        let note: Note = NoteRow {
            id: "n1".into(),
            owner: "u1".into(),
            title: "A".into(),
            visibility: "private".into(),
            folder: "F1".into(),
            created_ms: 7,
            content: None,
        }
        .into();
        assert_eq!(note.id, NoteId::new("n1"));
        assert_eq!(note.folder, FolderId::new("F1"));
        assert_eq!(note.timestamp, 7);
        assert!(note.content.is_none());
    }

    #[test]
    fn test_folder_row_keeps_order() {
        let folder: Folder = FolderRow {
            id: "F1".into(),
            notes: vec!["b".into(), "a".into()],
        }
        .into();
        assert_eq!(folder.notes, vec![NoteId::new("b"), NoteId::new("a")]);
    }
}
