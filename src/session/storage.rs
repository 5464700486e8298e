//! Session token persistence

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::auth::TransportError;

/// Key under which the session token is stored.
pub const TOKEN_KEY: &str = "Token";

const SESSION_FILE: &str = "session.json";
const LOCK_FILE: &str = "session.lock";

type Result<T> = std::result::Result<T, TransportError>;

/// Key-value storage that outlives a single run.
pub trait SessionStore: Send + Sync {
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn remove(&self, key: &str) -> Result<bool>;
}

/// True when a session token is present.
pub fn is_authenticated(store: &dyn SessionStore) -> Result<bool> {
    Ok(store
        .get(TOKEN_KEY)?
        .is_some_and(|token| !token.is_empty()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    updated_at: DateTime<Utc>,
}

/// JSON file in the app directory, one entry per key.
///
/// Writes hold an exclusive lock on a sibling lock file and replace the data
/// file via temp file + rename, so concurrent writers never interleave.
pub struct FileSessionStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            path: app_dir.join(SESSION_FILE),
            lock_path: app_dir.join(LOCK_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp of the last write to `key`.
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.load()?.get(key).map(|v| v.updated_at))
    }

    fn load(&self) -> Result<BTreeMap<String, StoredValue>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn lock(&self) -> Result<File> {
        if let Some(dir) = self.lock_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut BTreeMap<String, StoredValue>) -> T,
    {
        let lock = self.lock()?;
        let mut entries = self.load()?;
        let out = f(&mut entries);

        let json = serde_json::to_string_pretty(&entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        restrict_permissions(&tmp_path)?;
        fs::rename(&tmp_path, &self.path)?;

        lock.unlock()?;
        Ok(out)
    }
}

impl SessionStore for FileSessionStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(
                key.to_string(),
                StoredValue {
                    value: value.to_string(),
                    updated_at: Utc::now(),
                },
            );
        })?;
        tracing::debug!(key, path = %self.path.display(), "stored session value");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key).map(|v| v.value))
    }

    fn remove(&self, key: &str) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let removed = self.update(|entries| entries.remove(key).is_some())?;
        tracing::debug!(key, removed, "removed session value");
        Ok(removed)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries().remove(key).is_some())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}
