//! Persisted login session.
//!
//! The session is an explicit value handed to whatever needs it, never
//! ambient state: login writes the file, logout removes it, and protected
//! subcommands load it up front and refuse to run without one.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::types::UserRole;

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: UserRole,
    pub display_name: String,
}

impl Session {
    pub fn path(store_dir: &Path) -> PathBuf {
        store_dir.join(SESSION_FILE)
    }

    /// Load the stored session, if any. A missing file is not an error; a
    /// corrupt one is.
    pub fn load(store_dir: &Path) -> Result<Option<Session>> {
        let path = Self::path(store_dir);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let session: Session = serde_json::from_str(&contents)
            .with_context(|| format!("Session file is corrupt: {}", path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, store_dir: &Path) -> Result<()> {
        fs::create_dir_all(store_dir)
            .with_context(|| format!("Failed to create {}", store_dir.display()))?;
        let path = Self::path(store_dir);
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;
        info!("Session saved for {} ({})", self.display_name, self.role);
        Ok(())
    }

    /// Remove the stored session. Returns whether a session existed.
    pub fn clear(store_dir: &Path) -> Result<bool> {
        let path = Self::path(store_dir);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
            info!("Session cleared");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Session {
        Session {
            token: "tok-123".to_string(),
            role: UserRole::Admin,
            display_name: "Site Admin".to_string(),
        }
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempdir().unwrap();
        sample().save(dir.path()).unwrap();

        let loaded = Session::load(dir.path()).unwrap().unwrap();
        assert_eq!(loaded.token, "tok-123");
        assert_eq!(loaded.role, UserRole::Admin);
        assert_eq!(loaded.display_name, "Site Admin");
    }

    #[test]
    fn missing_session_is_none() {
        let dir = tempdir().unwrap();
        assert!(Session::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempdir().unwrap();
        sample().save(dir.path()).unwrap();

        assert!(Session::clear(dir.path()).unwrap());
        assert!(Session::load(dir.path()).unwrap().is_none());
        // Second clear is a no-op.
        assert!(!Session::clear(dir.path()).unwrap());
    }

    #[test]
    fn corrupt_session_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(Session::path(dir.path()), "{not json").unwrap();
        assert!(Session::load(dir.path()).is_err());
    }
}
