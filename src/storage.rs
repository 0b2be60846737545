use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::Config;
use crate::error::{ClientError, Result};

/// Storage key for the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the cached display name.
pub const USER_NAME_KEY: &str = "user_name";
/// Storage key for the tri-state cookie consent flag.
pub const COOKIES_ACCEPTED_KEY: &str = "cookies-accepted";
/// Storage key for the cookie preferences blob.
pub const COOKIE_PREFERENCES_KEY: &str = "cookie-preferences";
/// Storage key for the user session blob.
pub const USER_SESSION_KEY: &str = "user-session";
/// Storage key for the persisted cookie jar.
pub const COOKIE_JAR_KEY: &str = "cookie-jar";

#[derive(Default)]
struct Inner {
    /// Persisted values, written through on every mutation.
    values: HashMap<String, String>,
    /// Per-run values, never persisted (the sessionStorage analogue).
    ephemeral: HashMap<String, String>,
}

/// A browser-localStorage analogue: a flat string map persisted as a JSON
/// file, with synchronous write-through.
///
/// Every store in the crate (auth token, session record, consent flags,
/// cookie jar) lives behind this one map under a fixed key.
pub struct LocalStorage {
    inner: Mutex<Inner>,
    path: Option<PathBuf>,
}

impl LocalStorage {
    /// Opens (or creates) the storage file at `path`.
    ///
    /// An unreadable or corrupted file is discarded with a warning rather
    /// than propagated: local bookkeeping is never worth blocking startup.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!("⚠️ Corrupted storage file {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("📦 Local storage opened: {} keys", values.len());

        Ok(Self {
            inner: Mutex::new(Inner {
                values,
                ephemeral: HashMap::new(),
            }),
            path: Some(path),
        })
    }

    /// Opens the storage file configured by `config.storage_path`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(&config.storage_path)
    }

    /// Creates a storage that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            path: None,
        }
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Stores `value` under `key` and persists immediately.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.values.insert(key.to_string(), value.to_string());
        self.persist(&inner)
    }

    /// Removes `key` and persists. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut inner = self.lock();
        if inner.values.remove(key).is_some() {
            self.persist(&inner)?;
        }
        Ok(())
    }

    /// Returns the ephemeral (per-run) value stored under `key`.
    pub fn get_ephemeral(&self, key: &str) -> Option<String> {
        self.lock().ephemeral.get(key).cloned()
    }

    /// Stores an ephemeral value. Never written to disk.
    pub fn set_ephemeral(&self, key: &str, value: &str) {
        self.lock()
            .ephemeral
            .insert(key.to_string(), value.to_string());
    }

    /// Clears all ephemeral values (session teardown).
    pub fn clear_ephemeral(&self) {
        self.lock().ephemeral.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panic mid-write; the map is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, inner: &Inner) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string(&inner.values)?;
        std::fs::write(path, raw)
            .map_err(|e| ClientError::Storage(format!("write {}: {}", path.display(), e)))
    }
}
