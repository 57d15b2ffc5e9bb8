//! Persisted session
//!
//! Keeps the signed-in session between invocations so `finwise expense list`
//! works after `finwise auth signin`. Every process reading the same file sees
//! the same sign-in state.

use std::path::{Path, PathBuf};

use crate::error::FinwiseResult;
use crate::models::Session;

use super::file_io::{read_json_optional, remove_if_exists, write_json_atomic};

/// File-backed session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, if any
    pub fn load(&self) -> FinwiseResult<Option<Session>> {
        read_json_optional(&self.path)
    }

    /// Persist a session, replacing any previous one
    pub fn save(&self, session: &Session) -> FinwiseResult<()> {
        write_json_atomic(&self.path, session)
    }

    /// Forget the stored session
    pub fn clear(&self) -> FinwiseResult<()> {
        remove_if_exists(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserId, UserMetadata};
    use tempfile::TempDir;

    fn session() -> Session {
        Session {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at: 1_900_000_000,
            user: User {
                id: UserId::new(),
                email: "asha@example.com".into(),
                user_metadata: UserMetadata::default(),
            },
        }
    }

    #[test]
    fn test_save_load_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path().join("data").join("session.json"));

        assert!(store.load().unwrap().is_none());

        let session = session();
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
