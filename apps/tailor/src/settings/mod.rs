// Settings persistence: one string field, the user's base resume.
// SettingsStore is the seam; the service uses JsonFileStore, tests use MemoryStore.

pub mod handlers;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::debug;

/// Key under which the base resume is stored.
pub const BASE_RESUME_KEY: &str = "baseResume";
/// Shortest base resume accepted on save (after trimming).
pub const MIN_RESUME_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("settings lock poisoned")]
    Poisoned,

    #[error("settings task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// Returns the stored base resume, treating an empty value as absent.
pub fn load_base_resume(store: &dyn SettingsStore) -> Result<Option<String>, SettingsError> {
    Ok(store.get(BASE_RESUME_KEY)?.filter(|r| !r.trim().is_empty()))
}

/// Runs `op` against the store on the blocking pool. File-backed stores do
/// plain `std::fs` I/O.
pub async fn with_store<T, F>(store: Arc<dyn SettingsStore>, op: F) -> Result<T, SettingsError>
where
    F: FnOnce(&dyn SettingsStore) -> Result<T, SettingsError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || op(store.as_ref())).await?
}

/// Checks the minimum length a stored resume must have.
pub fn is_valid_resume(resume: &str) -> bool {
    resume.trim().chars().count() >= MIN_RESUME_CHARS
}

// ────────────────────────────────────────────────────────────────────────────
// JsonFileStore
// ────────────────────────────────────────────────────────────────────────────

/// Flat JSON object on disk. A missing file reads as empty.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let _guard = self.lock.lock().map_err(|_| SettingsError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let _guard = self.lock.lock().map_err(|_| SettingsError::Poisoned)?;
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(&all)?)?;
        debug!(key, path = %self.path.display(), "Setting saved");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryStore
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

#[cfg(test)]
impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let values = self.values.lock().map_err(|_| SettingsError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut values = self.values.lock().map_err(|_| SettingsError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
