//! Session store: the client's belief about who is logged in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mirrors two identity fields (`username`, `role`) into an origin-scoped
//! key-value store so they survive restarts, the way a browser keeps them in
//! local storage. The server stays the authority: nothing here grants access,
//! and balance reads are always re-validated remotely.
//!
//! ERROR HANDLING
//! ==============
//! Backend failures are logged and swallowed. `get` never fails and falls
//! back to the default identity. `set` writes both keys as one batch, so a
//! failed write never leaves a username without its role on disk.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const USERNAME_KEY: &str = "username";
const ROLE_KEY: &str = "role";
const DEFAULT_USERNAME: &str = "User";

// =============================================================================
// IDENTITY
// =============================================================================

/// Account role. Customers are the only kind of account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Customer,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
        }
    }

    /// Parse a stored role label, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().eq_ignore_ascii_case("customer").then_some(Self::Customer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity the UI believes is logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self { username: username.into(), role }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, Role::Customer)
    }
}

// =============================================================================
// KEY-VALUE BACKENDS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io failed for {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("store file {path} is not valid JSON: {source}")]
    Encoding { path: PathBuf, source: serde_json::Error },
}

/// String key-value storage backing the session store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Write several values as one unit. Backends that can commit atomically
    /// should override this.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot be written.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        entries.iter().try_for_each(|(key, value)| self.set(key, value))
    }
}

/// Process-local store. Forgets everything on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// JSON file store, one file per origin.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Store at an explicit file path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Store scoped to `origin` inside `dir`.
    #[must_use]
    pub fn for_origin(dir: &Path, origin: &str) -> Self {
        Self::at(dir.join(format!("{}.json", origin_file_stem(origin))))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(StoreError::Io { path: self.path.clone(), source }),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Encoding { path: self.path.clone(), source })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|source| StoreError::Encoding { path: self.path.clone(), source })?;
        std::fs::write(&self.path, raw).map_err(io_err)
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn set_many(&self, batch: &[(&str, &str)]) -> Result<(), StoreError> {
        self.update(|entries| {
            for (key, value) in batch {
                entries.insert((*key).to_owned(), (*value).to_owned());
            }
        })
    }
}

/// Filesystem-safe stem for an origin, e.g. `http_127.0.0.1_5000`.
pub(crate) fn origin_file_stem(origin: &str) -> String {
    let trimmed = origin.trim().trim_end_matches('/').replace("://", "_");
    trimmed
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect()
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// Injectable handle over the persisted identity. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Session store over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Persist `identity`, overwriting whatever was there.
    pub fn set(&self, identity: &Session) {
        let batch = [(USERNAME_KEY, identity.username.as_str()), (ROLE_KEY, identity.role.as_str())];
        if let Err(e) = self.backend.set_many(&batch) {
            tracing::warn!(error = %e, "session store write failed");
        }
    }

    /// Last persisted identity, or the default `User` / `Customer` identity.
    #[must_use]
    pub fn get(&self) -> Session {
        let username = self.read(USERNAME_KEY).unwrap_or_else(|| DEFAULT_USERNAME.to_owned());
        let role = self.read(ROLE_KEY).and_then(|raw| Role::parse(&raw)).unwrap_or_default();
        Session { username, role }
    }

    /// Persisted identity, if a username has been stored.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.read(USERNAME_KEY)?;
        Some(self.get())
    }

    /// Forget the persisted identity.
    pub fn clear(&self) {
        for key in [USERNAME_KEY, ROLE_KEY] {
            if let Err(e) = self.backend.remove(key) {
                tracing::warn!(error = %e, key, "session store clear failed");
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, key, "session store read failed");
                None
            }
        }
    }
}
