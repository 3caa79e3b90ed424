//! Persisted session file handling.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A persisted authentication session: the cookie set of one logged-in
/// username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub username: String,
    pub cookies: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// Result of looking up a cached session.
///
/// The three states are distinct so the caller can log why it is falling
/// through to a login, instead of swallowing errors as control flow.
#[derive(Debug)]
pub enum CachedSession {
    /// No session file exists.
    Missing,
    /// A file exists but is unreadable, malformed, or for another username.
    Invalid(String),
    Loaded(SessionData),
}

/// One session file per username, JSON, overwritten on re-login.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the cached session for the given username.
    pub fn load(&self, username: &str) -> CachedSession {
        if !self.path.is_file() {
            return CachedSession::Missing;
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => return CachedSession::Invalid(format!("unreadable session file: {}", e)),
        };

        let data: SessionData = match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(e) => return CachedSession::Invalid(format!("malformed session file: {}", e)),
        };

        if data.username != username {
            return CachedSession::Invalid(format!(
                "session file belongs to '{}', not '{}'",
                data.username, username
            ));
        }

        CachedSession::Loaded(data)
    }

    /// Persist a session, overwriting any prior content.
    pub fn save(&self, data: &SessionData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!("session saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_for(username: &str) -> SessionData {
        let mut cookies = HashMap::new();
        cookies.insert("sessionid".to_string(), "1:abc".to_string());
        SessionData {
            username: username.to_string(),
            cookies,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session-alice"));
        assert!(matches!(store.load("alice"), CachedSession::Missing));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session-alice"));

        store.save(&session_for("alice")).unwrap();

        match store.load("alice") {
            CachedSession::Loaded(data) => {
                assert_eq!(data.username, "alice");
                assert_eq!(data.cookies.get("sessionid").map(String::as_str), Some("1:abc"));
            }
            other => panic!("expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session-alice");
        std::fs::write(&path, "not json at all").unwrap();

        let store = SessionStore::new(path);
        assert!(matches!(store.load("alice"), CachedSession::Invalid(_)));
    }

    #[test]
    fn test_load_wrong_username() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session"));
        store.save(&session_for("bob")).unwrap();

        assert!(matches!(store.load("alice"), CachedSession::Invalid(_)));
    }

    #[test]
    fn test_save_overwrites_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/session-alice");
        let store = SessionStore::new(path);

        store.save(&session_for("alice")).unwrap();

        let mut second = session_for("alice");
        second
            .cookies
            .insert("sessionid".to_string(), "2:def".to_string());
        store.save(&second).unwrap();

        match store.load("alice") {
            CachedSession::Loaded(data) => {
                assert_eq!(data.cookies.get("sessionid").map(String::as_str), Some("2:def"));
            }
            other => panic!("expected Loaded, got {:?}", other),
        }
    }
}
