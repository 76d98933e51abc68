//! Journal persistence.
//!
//! State lives in three named blobs (profile, chapters, journal), each the
//! JSON serialization of its record. Storage goes through the [`BlobStore`]
//! trait so sessions can run against a directory on disk or an in-memory map.

use crate::journal::{CharacterProfile, JournalEntry, StoryChapter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tokio::fs;

pub const PROFILE_KEY: &str = "fantasify-profile";
pub const CHAPTERS_KEY: &str = "fantasify-chapters";
pub const JOURNAL_KEY: &str = "fantasify-journal";

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A string-valued key/value store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read a blob. A missing key is `Ok(None)`, not an error.
    async fn read(&self, key: &str) -> Result<Option<String>, PersistError>;

    async fn write(&self, key: &str, value: &str) -> Result<(), PersistError>;

    /// Remove a blob. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), PersistError>;
}

/// One `<key>.json` file per blob inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect::<String>();
        self.dir.join(format!("{sanitized}.json"))
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), PersistError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
        }
        fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock can't leave the map half-written.
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Everything a journal needs to resume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedJournal {
    pub profile: Option<CharacterProfile>,
    pub entries: Vec<JournalEntry>,
    pub chapters: Vec<StoryChapter>,
}

/// Load all three blobs. Missing blobs load as empty.
pub async fn load_journal(store: &dyn BlobStore) -> Result<SavedJournal, PersistError> {
    let profile = match store.read(PROFILE_KEY).await? {
        Some(json) => Some(serde_json::from_str(&json)?),
        None => None,
    };
    let chapters = match store.read(CHAPTERS_KEY).await? {
        Some(json) => serde_json::from_str(&json)?,
        None => Vec::new(),
    };
    let entries = match store.read(JOURNAL_KEY).await? {
        Some(json) => serde_json::from_str(&json)?,
        None => Vec::new(),
    };

    Ok(SavedJournal {
        profile,
        entries,
        chapters,
    })
}

/// Write the full journal state.
///
/// Without a profile nothing is written; there is no adventure to save yet.
/// Empty lists are written as `[]` so a rollback to zero entries is durable.
pub async fn save_journal(
    store: &dyn BlobStore,
    profile: Option<&CharacterProfile>,
    entries: &[JournalEntry],
    chapters: &[StoryChapter],
) -> Result<(), PersistError> {
    let Some(profile) = profile else {
        return Ok(());
    };

    store
        .write(PROFILE_KEY, &serde_json::to_string(profile)?)
        .await?;
    store
        .write(CHAPTERS_KEY, &serde_json::to_string(chapters)?)
        .await?;
    store
        .write(JOURNAL_KEY, &serde_json::to_string(entries)?)
        .await?;
    Ok(())
}

/// Remove the chapter and journal blobs, keeping the profile.
pub async fn clear_history(store: &dyn BlobStore) -> Result<(), PersistError> {
    store.remove(CHAPTERS_KEY).await?;
    store.remove(JOURNAL_KEY).await?;
    Ok(())
}

/// Remove all three blobs.
pub async fn clear_all(store: &dyn BlobStore) -> Result<(), PersistError> {
    store.remove(PROFILE_KEY).await?;
    clear_history(store).await
}
