//! Persisted API token.
//!
//! One token per installation: the last token that passed validation.
//! Later setups offer it as the default so users don't have to find it
//! again.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::domain::ApiToken;

use super::TokenStore;
use super::error::StoreError;
use super::file::{read_json, write_json};

/// Storage format version of the token file.
pub const TOKEN_STORAGE_VERSION: u32 = 1;

/// Namespace key of the token file.
pub const TOKEN_STORAGE_KEY: &str = "national_rail_departures.token";

/// On-disk layout of the token file.
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    version: u32,
    key: String,
    data: TokenData,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenData {
    token: ApiToken,
}

/// Token store backed by a versioned JSON file.
#[derive(Debug)]
pub struct JsonTokenStore {
    path: PathBuf,
    /// Serializes writers; the last save wins.
    write_lock: Mutex<()>,
}

impl JsonTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store the token file in `dir` under the namespace key.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(TOKEN_STORAGE_KEY))
    }

    /// Get the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for JsonTokenStore {
    async fn load(&self) -> Result<Option<ApiToken>, StoreError> {
        let Some(stored) = read_json::<StoredToken>(&self.path).await? else {
            return Ok(None);
        };

        if stored.version != TOKEN_STORAGE_VERSION || stored.key != TOKEN_STORAGE_KEY {
            return Err(StoreError::Version {
                version: stored.version,
                key: stored.key,
            });
        }

        // An empty token on disk is as good as none.
        Ok(ApiToken::new(stored.data.token.expose()))
    }

    async fn save(&self, token: &ApiToken) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let stored = StoredToken {
            version: TOKEN_STORAGE_VERSION,
            key: TOKEN_STORAGE_KEY.to_string(),
            data: TokenData {
                token: token.clone(),
            },
        };

        write_json(&self.path, &stored).await
    }
}

/// In-memory token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<ApiToken>>,
    saves: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    pub fn with_token(token: ApiToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<ApiToken>, StoreError> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &ApiToken) -> Result<(), StoreError> {
        *self.token.write().await = Some(token.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
