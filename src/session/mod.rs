//! Cached login session.
//!
//! The signed-in user and session cookie are kept in one JSON file so that
//! consecutive invocations stay logged in. The user is stored under the
//! `cms:auth:user` key.

use crate::models::SessionUser;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Key of the cached user in the session file.
pub const SESSION_KEY: &str = "cms:auth:user";

/// Contents of the session file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(rename = "cms:auth:user", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

/// File-backed session cache.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    data: SessionData,
}

fn read_session(path: &Path) -> SessionData {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return SessionData::default(),
    };

    match serde_json::from_str(&content) {
        Ok(data) => data,
        Err(e) => {
            warn!("Ignoring corrupt session file {}: {}", path.display(), e);
            SessionData::default()
        }
    }
}

impl SessionStore {
    /// Load the session at `path`. A missing or unreadable file yields an
    /// empty session.
    pub fn hydrate(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = read_session(&path);
        debug!(
            "Session hydrated from {} ({}: {})",
            path.display(),
            SESSION_KEY,
            data.user.is_some()
        );
        Self { path, data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.data.user.as_ref()
    }

    pub fn cookie(&self) -> Option<&str> {
        self.data.cookie.as_deref()
    }

    /// Replace the cached user. A `None` cookie keeps the current one.
    pub fn set(&mut self, user: Option<SessionUser>, cookie: Option<String>) {
        self.data.user = user;
        if cookie.is_some() {
            self.data.cookie = cookie;
        }
    }

    /// Write the session file atomically.
    pub fn persist(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let json = serde_json::to_string_pretty(&self.data)
            .context("Failed to serialize session")?;

        let mut file = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        file.write_all(json.as_bytes())
            .context("Failed to write session")?;
        file.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to save session: {}", self.path.display()))?;

        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Forget the session and delete the file.
    pub fn clear(&mut self) -> Result<()> {
        self.data = SessionData::default();
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session: {}", self.path.display()))?;
        }
        Ok(())
    }

    /// Re-read the file after another process may have written it.
    /// Returns whether the cached user changed.
    pub fn reload_if_changed(&mut self) -> bool {
        let fresh = read_session(&self.path);
        if fresh == self.data {
            return false;
        }

        let user_changed = fresh.user != self.data.user;
        self.data = fresh;
        if user_changed {
            debug!("Session user changed on disk");
        }
        user_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn admin() -> SessionUser {
        SessionUser {
            id: Some(1),
            username: Some("admin".to_string()),
            role: Some("ADMIN".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_hydrate_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::hydrate(dir.path().join("session.json"));
        assert!(store.user().is_none());
        assert!(store.cookie().is_none());
    }

    #[test]
    fn test_hydrate_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = SessionStore::hydrate(&path);
        assert!(store.user().is_none());
    }

    #[test]
    fn test_persist_and_hydrate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = SessionStore::hydrate(&path);
        store.set(Some(admin()), Some("JSESSIONID=abc".to_string()));
        store.persist().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[SESSION_KEY]["username"], "admin");
        assert_eq!(raw["cookie"], "JSESSIONID=abc");

        let reloaded = SessionStore::hydrate(&path);
        assert_eq!(reloaded.user(), Some(&admin()));
        assert_eq!(reloaded.cookie(), Some("JSESSIONID=abc"));
    }

    #[test]
    fn test_set_keeps_cookie_when_none() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::hydrate(dir.path().join("s.json"));
        store.set(Some(admin()), Some("a=1".to_string()));
        store.set(None, None);
        assert!(store.user().is_none());
        assert_eq!(store.cookie(), Some("a=1"));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut store = SessionStore::hydrate(&path);
        store.set(Some(admin()), None);
        store.persist().unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        assert!(store.user().is_none());
        // Clearing twice is fine.
        tokio_test::assert_ok!(store.clear());
    }

    #[test]
    fn test_reload_if_changed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut ours = SessionStore::hydrate(&path);
        assert!(!ours.reload_if_changed());

        let mut theirs = SessionStore::hydrate(&path);
        theirs.set(Some(admin()), Some("c=1".to_string()));
        theirs.persist().unwrap();

        assert!(ours.reload_if_changed());
        assert_eq!(ours.user(), Some(&admin()));

        // Only the cookie changed: not a user change.
        theirs.set(Some(admin()), Some("c=2".to_string()));
        theirs.persist().unwrap();
        assert!(!ours.reload_if_changed());
        assert_eq!(ours.cookie(), Some("c=2"));
    }
}
