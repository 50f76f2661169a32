//! Persistence of role hints between runs.

use super::RoleHint;
use crate::fs_utils::open_ambient_dir;
use crate::task::domain::WalletAddress;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// File name used by [`FileSessionStore`].
pub const SESSION_FILE_NAME: &str = "session.json";

/// Persisted role hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Role chosen for the current session.
    #[serde(default)]
    pub session_role: Option<RoleHint>,
    /// Role last chosen for each wallet address.
    #[serde(default)]
    pub roles: BTreeMap<WalletAddress, RoleHint>,
}

/// Errors raised by session stores.
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    /// The backing file could not be read or written.
    #[error("session store I/O failed at {path}: {source}")]
    Io {
        /// Location of the session file.
        path: String,
        /// Underlying failure.
        source: Arc<io::Error>,
    },

    /// The stored snapshot is not valid JSON.
    #[error("malformed session file: {0}")]
    Format(String),
}

/// Storage for [`SessionSnapshot`] values.
pub trait SessionStore: Send + Sync {
    /// Loads the saved snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError`] when the snapshot cannot be read.
    fn load(&self) -> Result<Option<SessionSnapshot>, SessionStoreError>;

    /// Replaces the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError`] when the snapshot cannot be written.
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionStoreError>;
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    snapshot: Mutex<Option<SessionSnapshot>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<SessionSnapshot>, SessionStoreError> {
        Ok(self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionStoreError> {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }
}

/// Session store writing JSON into a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: Utf8PathBuf,
}

impl FileSessionStore {
    /// Creates a store keeping [`SESSION_FILE_NAME`] inside `dir`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the session file location.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.dir.join(SESSION_FILE_NAME)
    }

    fn io_error(&self, source: io::Error) -> SessionStoreError {
        SessionStoreError::Io {
            path: self.path().into_string(),
            source: Arc::new(source),
        }
    }
}

fn create_dir_all(path: &Utf8Path) -> io::Result<Dir> {
    Dir::create_ambient_dir_all(path, ambient_authority())?;
    open_ambient_dir(path)
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionSnapshot>, SessionStoreError> {
        let dir = match open_ambient_dir(&self.dir) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        let contents = match dir.read_to_string(SESSION_FILE_NAME) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|err| SessionStoreError::Format(err.to_string()))
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionStoreError> {
        let dir = create_dir_all(&self.dir).map_err(|err| self.io_error(err))?;
        let contents = serde_json::to_vec_pretty(snapshot)
            .map_err(|err| SessionStoreError::Format(err.to_string()))?;
        dir.write(SESSION_FILE_NAME, contents)
            .map_err(|err| self.io_error(err))
    }
}
