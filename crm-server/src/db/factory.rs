//! Per-user storage factory
//!
//! The isolation mechanism of the whole system: one database file per
//! user, derived from the configured base filename (`crm.db` →
//! `crm.<user>.db`), one lazily-created [`DbService`] per normalized id,
//! cached for the process lifetime. A given user always gets the same
//! handle; different users never share mutable state or files. There are
//! no cross-user queries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use shared::util::normalize_user_key;

use super::DbService;
use crate::identity::roster;
use crate::utils::AppResult;

/// Storage backend, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// File-backed SQLite, one file per user (default)
    File,
    /// In-memory SQLite, one database per user (test double)
    Memory,
}

impl StorageBackend {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "memory" => Self::Memory,
            _ => Self::File,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

/// Factory and cache for per-user store handles.
#[derive(Debug)]
pub struct StoreFactory {
    backend: StorageBackend,
    work_dir: PathBuf,
    base_file: String,
    // Creation is awaited under the lock so concurrent first requests for
    // one user cannot race two pools into existence.
    handles: Mutex<HashMap<String, DbService>>,
}

impl StoreFactory {
    pub fn new(backend: StorageBackend, work_dir: impl Into<PathBuf>, base_file: &str) -> Self {
        Self {
            backend,
            work_dir: work_dir.into(),
            base_file: base_file.to_string(),
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Insert the user id into the base filename: `crm.db` → `crm.<user>.db`.
    fn path_for(&self, user_id: &str) -> PathBuf {
        let base = Path::new(&self.base_file);
        let stem = base
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("crm");
        let file = match base.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}.{user_id}.{ext}"),
            None => format!("{stem}.{user_id}"),
        };
        self.work_dir.join(file)
    }

    /// Get (or lazily create) the store handle for a user.
    ///
    /// The id is normalized first; an empty result falls back to the
    /// default user so legacy callers without an id still land somewhere
    /// deterministic.
    pub async fn for_user(&self, user_id: &str) -> AppResult<DbService> {
        let mut key = normalize_user_key(user_id);
        if key.is_empty() {
            key = roster::DEFAULT_USER_ID.to_string();
        }

        let mut handles = self.handles.lock().await;
        if let Some(handle) = handles.get(&key) {
            return Ok(handle.clone());
        }

        let handle = match self.backend {
            StorageBackend::Memory => DbService::new_in_memory().await?,
            StorageBackend::File => {
                let path = self.path_for(&key);
                let path_str = path.to_string_lossy().to_string();
                DbService::new(&path_str).await?
            }
        };

        handles.insert(key, handle.clone());
        Ok(handle)
    }

    /// Number of stores opened so far (health reporting).
    pub async fn open_stores(&self) -> usize {
        self.handles.lock().await.len()
    }

    pub fn backend(&self) -> StorageBackend {
        self.backend
    }
}
