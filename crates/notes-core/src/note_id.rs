//! Note id derivation.
//!
//! # Content-hash ids
//!
//! By default a note's id is derived from the record it is created from:
//! 1. Encode each field of the [`NoteDraft`] in declaration order
//!    (`title`, `visibility`, `folder`, `timestamp`, `owner`), every field
//!    tagged with its name and length-prefixed
//! 2. Hash the encoding with blake3
//! 3. Hex-encode the 32-byte digest
//!
//! The same draft always yields the same id. Two drafts that differ only
//! below timestamp resolution collide; the store rejects the second insert.
//!
//! # Random ids
//!
//! [`NoteIdStrategy::Random`] ignores the draft and issues a UUID v4.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::types::{NoteDraft, NoteId};

/// Derive the content-hash id of a draft.
///
/// # Example
///
/// ```
/// use notes_core::{derive_note_id, FolderId, NoteDraft};
///
/// let draft = NoteDraft {
///     title: "A".into(),
///     visibility: "private".into(),
///     folder: FolderId::new("F1"),
///     timestamp: 1_700_000_000_000,
///     owner: "u1".into(),
/// };
///
/// let id = derive_note_id(&draft);
/// assert_eq!(id.as_str().len(), 64);
/// assert_eq!(id, derive_note_id(&draft.clone()));
/// ```
pub fn derive_note_id(draft: &NoteDraft) -> NoteId {
    let mut hasher = blake3::Hasher::new();
    hash_field(&mut hasher, "title", draft.title.as_bytes());
    hash_field(&mut hasher, "visibility", draft.visibility.as_bytes());
    hash_field(&mut hasher, "folder", draft.folder.as_str().as_bytes());
    hash_field(&mut hasher, "timestamp", &draft.timestamp.to_be_bytes());
    hash_field(&mut hasher, "owner", draft.owner.as_bytes());
    NoteId(hasher.finalize().to_hex().to_string())
}

fn hash_field(hasher: &mut blake3::Hasher, name: &str, value: &[u8]) {
    hasher.update(name.as_bytes());
    hasher.update(&[0]);
    hasher.update(&(value.len() as u64).to_be_bytes());
    hasher.update(value);
}

/// How new notes get their ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoteIdStrategy {
    /// blake3 over the creation record.
    #[default]
    ContentHash,
    /// UUID v4, independent of content.
    Random,
}

impl NoteIdStrategy {
    /// Assign an id to `draft`.
    pub fn assign(&self, draft: &NoteDraft) -> NoteId {
        match self {
            Self::ContentHash => derive_note_id(draft),
            Self::Random => NoteId(Uuid::new_v4().to_string()),
        }
    }
}

impl fmt::Display for NoteIdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentHash => f.write_str("content-hash"),
            Self::Random => f.write_str("random"),
        }
    }
}

/// Returned when parsing an unrecognised strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown note id strategy: {0} (expected content-hash or random)")]
pub struct UnknownStrategy(pub String);

impl FromStr for NoteIdStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content-hash" | "hash" => Ok(Self::ContentHash),
            "random" | "uuid" => Ok(Self::Random),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FolderId;

    fn draft() -> NoteDraft {
        NoteDraft {
            title: "A".into(),
            visibility: "private".into(),
            folder: FolderId::new("F1"),
            timestamp: 1_700_000_000_000,
            owner: "u1".into(),
        }
    }

    #[test]
    fn test_derive_note_id_format() {
        let id = derive_note_id(&draft());
        assert_eq!(id.as_str().len(), 64);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_derive_note_id_deterministic() {
        assert_eq!(derive_note_id(&draft()), derive_note_id(&draft()));
    }

    #[test]
    fn test_every_field_contributes() {
        let base = derive_note_id(&draft());

        let mut d = draft();
        d.title = "B".into();
        assert_ne!(derive_note_id(&d), base);

        let mut d = draft();
        d.visibility = "public".into();
        assert_ne!(derive_note_id(&d), base);

        let mut d = draft();
        d.folder = FolderId::new("F2");
        assert_ne!(derive_note_id(&d), base);

        let mut d = draft();
        d.timestamp += 1;
        assert_ne!(derive_note_id(&d), base);

        let mut d = draft();
        d.owner = "u2".into();
        assert_ne!(derive_note_id(&d), base);
    }

    #[test]
    fn test_field_boundaries_are_unambiguous() {
        let mut a = draft();
        a.title = "ab".into();
        a.visibility = "c".into();
        let mut b = draft();
        b.title = "a".into();
        b.visibility = "bc".into();
        assert_ne!(derive_note_id(&a), derive_note_id(&b));
    }

    #[test]
    fn test_random_strategy_ignores_content() {
        let first = NoteIdStrategy::Random.assign(&draft());
        let second = NoteIdStrategy::Random.assign(&draft());
        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "content-hash".parse::<NoteIdStrategy>().unwrap(),
            NoteIdStrategy::ContentHash
        );
        assert_eq!(
            " Random ".parse::<NoteIdStrategy>().unwrap(),
            NoteIdStrategy::Random
        );
        assert!("sequential".parse::<NoteIdStrategy>().is_err());
    }

    #[test]
    fn test_strategy_display_roundtrip() {
        for strategy in [NoteIdStrategy::ContentHash, NoteIdStrategy::Random] {
            assert_eq!(strategy.to_string().parse::<NoteIdStrategy>().unwrap(), strategy);
        }
    }
}
