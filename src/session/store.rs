use crate::error::{Error, Result};
use crate::models::{AuthTokens, User};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// What survives between runs: tokens and the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub tokens: AuthTokens,
    pub user: User,
}

/// Persistence capability for [`super::Session`]
pub trait SessionStore: Send + Sync {
    /// `Ok(None)` when nothing is stored; `Err` when stored data is unreadable
    fn load(&self) -> Result<Option<StoredSession>>;

    fn save(&self, session: &StoredSession) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// Keeps the serialized session in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with already-serialized contents
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.raw.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredSession>> {
        self.slot()
            .as_deref()
            .map(serde_json::from_str::<StoredSession>)
            .transpose()
            .map_err(|e| Error::Storage(format!("corrupt session: {e}")))
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        *self.slot() = Some(serde_json::to_string(session)?);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// Keeps the session in a JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::Storage(format!("corrupt session file {}: {e}", self.path.display())))
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
