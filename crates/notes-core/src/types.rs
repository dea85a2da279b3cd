//! Core data types for the Notes Service.
//!
//! Notes live in folders. A [`Folder`] keeps the ordered list of note ids
//! filed in it, and every [`Note`] records the folder it was created in and
//! the uid of the [`User`] who created it.
//!
//! Users and their root folders are provisioned outside this service and
//! are only ever read here.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ID Types
// ============================================================================

/// Literal folder id that stands for the requesting user's root folder.
pub const ROOT_FOLDER_SENTINEL: &str = "root";

/// Identifier of a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub String);

impl FolderId {
    /// Creates a FolderId from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FolderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a note.
///
/// Produced by a [`crate::NoteIdStrategy`] at creation time and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub String);

impl NoteId {
    /// Creates a NoteId from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A folder reference as supplied by a client.
///
/// Either a concrete folder id or the `"root"` sentinel. The sentinel is
/// resolved against the requesting user before any store access and is
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum FolderRef {
    /// The requesting user's root folder.
    Root,
    /// An explicit folder id.
    Id(FolderId),
}

impl FolderRef {
    /// Interpret a raw folder id, recognising the root sentinel.
    pub fn parse(raw: &str) -> Self {
        if raw == ROOT_FOLDER_SENTINEL {
            Self::Root
        } else {
            Self::Id(FolderId::new(raw))
        }
    }

    /// Resolve this reference to a concrete folder id for `user`.
    #[must_use]
    pub fn resolve(&self, user: &User) -> FolderId {
        match self {
            Self::Root => user.root.clone(),
            Self::Id(id) => id.clone(),
        }
    }
}

impl From<String> for FolderRef {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for FolderRef {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for FolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str(ROOT_FOLDER_SENTINEL),
            Self::Id(id) => f.write_str(id.as_str()),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// A user known to this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Externally issued identity.
    pub uid: String,
    /// The user's root folder.
    pub root: FolderId,
}

impl User {
    pub fn new(uid: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            root: FolderId::new(root),
        }
    }
}

/// A folder and the ids of the notes filed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    #[serde(default)]
    pub notes: Vec<NoteId>,
}

impl Folder {
    /// An empty folder.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: FolderId::new(id),
            notes: Vec::new(),
        }
    }
}

/// The fields a note is created from.
///
/// This is the record the content-hash id is computed over, so its fields
/// are exactly those fixed at creation time. `owner` is part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    pub title: String,
    pub visibility: String,
    pub folder: FolderId,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub owner: String,
}

impl NoteDraft {
    /// Attach an id, producing the note to be stored.
    #[must_use]
    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id,
            owner: self.owner,
            title: self.title,
            visibility: self.visibility,
            folder: self.folder,
            timestamp: self.timestamp,
            content: None,
        }
    }
}

/// A stored note.
///
/// Only `title` and `content` change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// uid of the creating user.
    pub owner: String,
    pub title: String,
    pub visibility: String,
    pub folder: FolderId,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Body text, absent until the first update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Outcome of a delete as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    /// Whether the store accepted and executed the delete.
    pub acknowledged: bool,
    /// Number of documents removed; zero when nothing matched.
    pub deleted_count: u64,
}

impl DeleteResult {
    /// An acknowledged delete of `deleted_count` documents.
    #[must_use]
    pub const fn acknowledged(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_ref_recognises_root_sentinel() {
        assert_eq!(FolderRef::parse("root"), FolderRef::Root);
        assert_eq!(
            FolderRef::parse("F7"),
            FolderRef::Id(FolderId::new("F7"))
        );
        // Only the exact literal is the sentinel.
        assert_eq!(
            FolderRef::parse("Root"),
            FolderRef::Id(FolderId::new("Root"))
        );
    }

    #[test]
    fn folder_ref_resolves_against_user() {
        let user = User::new("u1", "F1");
        assert_eq!(FolderRef::Root.resolve(&user), FolderId::new("F1"));
        assert_eq!(
            FolderRef::parse("F2").resolve(&user),
            FolderId::new("F2")
        );
    }

    #[test]
    fn folder_ref_deserializes_from_string() {
        let root: FolderRef = serde_json::from_str(r#""root""#).unwrap();
        assert_eq!(root, FolderRef::Root);
        let other: FolderRef = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(other, FolderRef::Id(FolderId::new("abc")));
        // Same rule as `parse`: only the exact literal is the sentinel.
        let cased: FolderRef = serde_json::from_str(r#""ROOT""#).unwrap();
        assert_eq!(cased, FolderRef::parse("ROOT"));
        assert_eq!(FolderRef::from(String::from("root")), FolderRef::Root);
    }

    #[test]
    fn note_serializes_without_absent_content() {
        let note = NoteDraft {
            title: "A".into(),
            visibility: "private".into(),
            folder: FolderId::new("F1"),
            timestamp: 1_700_000_000_000,
            owner: "u1".into(),
        }
        .into_note(NoteId::new("n1"));

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], "n1");
        assert_eq!(json["folder"], "F1");
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
        assert!(json.get("content").is_none());
    }

    #[test]
    fn note_serializes_content_once_set() {
        let mut note = NoteDraft {
            title: "A".into(),
            visibility: "public".into(),
            folder: FolderId::new("F1"),
            timestamp: 1,
            owner: "u1".into(),
        }
        .into_note(NoteId::new("n1"));
        note.content = Some("body".into());

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["content"], "body");
    }
}
