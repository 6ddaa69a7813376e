//! Session identity and document snapshots.
//!
//! A session is one open preview surface. It is keyed by the normalized path
//! of the document it previews, so opening the same document twice always
//! lands on the same session.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::utils::hash::stable_id;

/// Identity of a preview session (16 lowercase hex chars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId([u8; 8]);

impl SessionId {
    /// Session id for a document. `path` must already be normalized.
    pub fn for_document(path: &Path) -> Self {
        Self(stable_id(path.as_os_str().as_encoded_bytes()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for SessionId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut id = [0u8; 8];
        hex::decode_to_slice(s, &mut id)?;
        Ok(Self(id))
    }
}

/// Immutable capture of a document's text.
///
/// Revisions are strictly increasing per session; a newer snapshot
/// supersedes, and never mutates, an older one.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub session: SessionId,
    pub revision: u64,
    pub text: Arc<str>,
}

impl Snapshot {
    pub fn new(session: SessionId, revision: u64, text: impl Into<Arc<str>>) -> Self {
        Self {
            session,
            revision,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_session_id_stable_per_path() {
        let a = SessionId::for_document(Path::new("/work/thesis/main.tex"));
        let b = SessionId::for_document(&PathBuf::from("/work/thesis/main.tex"));
        let c = SessionId::for_document(Path::new("/work/thesis/appendix.tex"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_session_id_display_parse() {
        let id = SessionId::for_document(Path::new("/work/paper.tex"));
        let text = id.to_string();
        assert_eq!(text.len(), 16);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(text.parse::<SessionId>().unwrap(), id);
    }

    #[test]
    fn test_session_id_rejects_garbage() {
        assert!("not-a-session".parse::<SessionId>().is_err());
        assert!("abcd".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_snapshot_shares_text() {
        let id = SessionId::for_document(Path::new("/work/paper.tex"));
        let snapshot = Snapshot::new(id, 3, "\\documentclass{article}");
        let copy = snapshot.clone();
        assert!(Arc::ptr_eq(&snapshot.text, &copy.text));
        assert_eq!(copy.revision, 3);
    }
}
