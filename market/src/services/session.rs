//! # Session Stores
//!
//! Persistence for the signed-in [`User`] record, credential included.
//!
//! - [`FileSessionStore`]: JSON file on disk, used by the CLI shell
//! - [`MemorySessionStore`]: process-local, used by tests and embedders that
//!   keep the session elsewhere

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::core::error::{MarketError, Result};
use crate::core::service::SessionStore;
use crate::model::user::User;

/// Stores the user record as pretty-printed JSON at a fixed path.
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<User>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| MarketError::Storage(format!("{}: {}", self.path.display(), e)))
    }

    fn save(&self, user: &User) -> Result<()> {
        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let json = serde_json::to_string_pretty(user)
            .map_err(|e| MarketError::Storage(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| storage_error(&self.path, e))
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> MarketError {
    MarketError::Storage(format!("{}: {}", path.display(), err))
}

/// Keeps the record in memory.
#[derive(Default)]
pub struct MemorySessionStore {
    user: Mutex<Option<User>>,
}

impl MemorySessionStore {
    pub fn with_user(user: User) -> Self {
        Self {
            user: Mutex::new(Some(user)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<User>> {
        Ok(self.user.lock().clone())
    }

    fn save(&self, user: &User) -> Result<()> {
        *self.user.lock() = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.user.lock() = None;
        Ok(())
    }
}
