//! Configuration entries.
//!
//! An entry is one configured departure board: the token it uses, the home
//! station, and the destinations to filter on.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::domain::{ApiToken, Destinations, StationCode};

use super::ConfigEntries;
use super::error::StoreError;
use super::file::{read_json, write_json};

/// Storage format version of the entries file.
pub const ENTRY_STORAGE_VERSION: u32 = 1;

/// Identifier of a configuration entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an entry ID from its string form.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The data record of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryData {
    pub token: ApiToken,
    pub station: StationCode,
    /// Stored as the comma-joined string, `""` for all destinations.
    pub destinations: Destinations,
}

/// A persisted configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: EntryId,
    pub title: String,
    pub data: EntryData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConfigEntry {
    fn new(title: String, data: EntryData) -> Self {
        let now = Utc::now();
        Self {
            entry_id: EntryId::new(),
            title,
            data,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, title: String, data: EntryData) {
        self.title = title;
        self.data = data;
        self.updated_at = Utc::now();
    }
}

/// On-disk layout of the entries file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredEntries {
    version: u32,
    entries: Vec<ConfigEntry>,
}

/// Entry store backed by a JSON file.
///
/// Entries are held in memory and written through on every change.
/// `reload` re-reads an entry from disk, picking up edits made outside
/// this process.
#[derive(Debug)]
pub struct JsonEntryStore {
    path: PathBuf,
    entries: RwLock<Vec<ConfigEntry>>,
}

impl JsonEntryStore {
    /// Open the store, loading existing entries if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = Self::read_file(&path).await?;

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn read_file(path: &std::path::Path) -> Result<Vec<ConfigEntry>, StoreError> {
        let Some(stored) = read_json::<StoredEntries>(path).await? else {
            return Ok(Vec::new());
        };

        if stored.version != ENTRY_STORAGE_VERSION {
            return Err(StoreError::Version {
                version: stored.version,
                key: "entries".to_string(),
            });
        }

        Ok(stored.entries)
    }

    async fn persist(&self, entries: &[ConfigEntry]) -> Result<(), StoreError> {
        let stored = StoredEntries {
            version: ENTRY_STORAGE_VERSION,
            entries: entries.to_vec(),
        };
        write_json(&self.path, &stored).await
    }
}

impl ConfigEntries for JsonEntryStore {
    async fn get(&self, id: &EntryId) -> Result<Option<ConfigEntry>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| &e.entry_id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<ConfigEntry>, StoreError> {
        Ok(self.entries.read().await.clone())
    }

    async fn create(&self, title: String, data: EntryData) -> Result<ConfigEntry, StoreError> {
        let mut entries = self.entries.write().await;
        let entry = ConfigEntry::new(title, data);

        let mut updated = entries.clone();
        updated.push(entry.clone());
        self.persist(&updated).await?;
        *entries = updated;

        Ok(entry)
    }

    async fn update(
        &self,
        id: &EntryId,
        title: String,
        data: EntryData,
    ) -> Result<ConfigEntry, StoreError> {
        let mut entries = self.entries.write().await;

        let mut updated = entries.clone();
        let entry = updated
            .iter_mut()
            .find(|e| &e.entry_id == id)
            .ok_or(StoreError::EntryNotFound(*id))?;
        entry.replace(title, data);
        let entry = entry.clone();

        self.persist(&updated).await?;
        *entries = updated;

        Ok(entry)
    }

    async fn reload(&self, id: &EntryId) -> Result<(), StoreError> {
        // Held across the read so a concurrent write can't be replaced by
        // an older copy from disk.
        let mut entries = self.entries.write().await;

        let on_disk = Self::read_file(&self.path).await?;
        let fresh = on_disk
            .into_iter()
            .find(|e| &e.entry_id == id)
            .ok_or(StoreError::EntryNotFound(*id))?;

        match entries.iter_mut().find(|e| &e.entry_id == id) {
            Some(slot) => *slot = fresh,
            None => entries.push(fresh),
        }

        info!(entry_id = %id, "reloaded config entry");
        Ok(())
    }
}

/// In-memory entry store that records reload requests.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: RwLock<Vec<ConfigEntry>>,
    reloads: RwLock<Vec<EntryId>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// IDs passed to `reload`, in call order.
    pub async fn reloads(&self) -> Vec<EntryId> {
        self.reloads.read().await.clone()
    }
}

impl ConfigEntries for MemoryEntryStore {
    async fn get(&self, id: &EntryId) -> Result<Option<ConfigEntry>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| &e.entry_id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<ConfigEntry>, StoreError> {
        Ok(self.entries.read().await.clone())
    }

    async fn create(&self, title: String, data: EntryData) -> Result<ConfigEntry, StoreError> {
        let entry = ConfigEntry::new(title, data);
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn update(
        &self,
        id: &EntryId,
        title: String,
        data: EntryData,
    ) -> Result<ConfigEntry, StoreError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|e| &e.entry_id == id)
            .ok_or(StoreError::EntryNotFound(*id))?;
        entry.replace(title, data);
        Ok(entry.clone())
    }

    async fn reload(&self, id: &EntryId) -> Result<(), StoreError> {
        if self.get(id).await?.is_none() {
            return Err(StoreError::EntryNotFound(*id));
        }
        self.reloads.write().await.push(*id);
        Ok(())
    }
}
