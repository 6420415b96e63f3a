//! Login session shared by every request.
//!
//! [`SessionContext`] holds the bearer token in memory and mirrors it into a
//! [`SessionStore`] so a later process starts logged in. The token is read at
//! the moment each request is built, so a logout or a 401 takes effect on the
//! very next call.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted session record. Field names match the dashboard's storage keys.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub is_authenticated: bool,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            is_authenticated: true,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("is_authenticated", &self.is_authenticated)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where a session survives between runs.
pub trait SessionStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SessionError`] when stored data exists but cannot be read.
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// # Errors
    ///
    /// Returns [`SessionError`] when the session cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// # Errors
    ///
    /// Returns [`SessionError`] when stored data cannot be removed.
    fn clear(&self) -> Result<(), SessionError>;
}

/// JSON file on disk, e.g. `./.storedash/session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let session: Session =
            serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(session.is_authenticated.then_some(session))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let raw = serde_json::to_string_pretty(session).map_err(|source| {
            SessionError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, raw).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Process-local store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.as_ref().cloned())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}

struct Inner {
    store: Box<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

/// Shared handle to the current login. Cheap to clone.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Restores any persisted session from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the store holds unreadable data.
    pub fn restore(store: impl SessionStore + 'static) -> Result<Self, SessionError> {
        let current = store.load()?;
        Ok(Self {
            inner: Arc::new(Inner {
                store: Box::new(store),
                current: RwLock::new(current),
            }),
        })
    }

    /// A logged-out context backed by memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Box::new(MemorySessionStore::default()),
                current: RwLock::new(None),
            }),
        }
    }

    /// A logged-in context backed by memory only.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Session::new(token);
        Self {
            inner: Arc::new(Inner {
                store: Box::new(MemorySessionStore::with_session(session.clone())),
                current: RwLock::new(Some(session)),
            }),
        }
    }

    /// The bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().as_ref().is_some_and(|s| s.is_authenticated)
    }

    /// Route guard: the token when logged in.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::Unauthenticated`] when there is no session.
    pub fn require_authenticated(&self) -> Result<String, crate::ApiError> {
        self.read()
            .as_ref()
            .filter(|s| s.is_authenticated)
            .map(|s| s.token.clone())
            .ok_or(crate::ApiError::Unauthenticated)
    }

    /// Records a freshly issued token and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the store cannot be written. The
    /// in-memory session is set either way.
    pub fn establish(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let session = Session::new(token);
        *self.write() = Some(session.clone());
        self.inner.store.save(&session)
    }

    /// Forgets the session in memory and in the store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the store cannot be cleared.
    pub fn clear(&self) -> Result<(), SessionError> {
        *self.write() = None;
        self.inner.store.clear()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
