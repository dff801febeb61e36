//! Persistence for tokens and configuration entries.
//!
//! Both stores sit behind traits so the flows can run against in-memory
//! doubles in tests and against JSON files in the server.

mod entries;
mod error;
mod file;
mod token;

use std::future::Future;

use crate::domain::ApiToken;

pub use entries::{
    ConfigEntry, ENTRY_STORAGE_VERSION, EntryData, EntryId, JsonEntryStore, MemoryEntryStore,
};
pub use error::StoreError;
pub use token::{
    JsonTokenStore, MemoryTokenStore, TOKEN_STORAGE_KEY, TOKEN_STORAGE_VERSION,
};

/// Single-value store for the last accepted API token.
pub trait TokenStore: Send + Sync {
    /// The stored token, if any.
    fn load(&self) -> impl Future<Output = Result<Option<ApiToken>, StoreError>> + Send;

    /// Replace the stored token.
    fn save(&self, token: &ApiToken) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Storage and lifecycle of configuration entries.
pub trait ConfigEntries: Send + Sync {
    fn get(
        &self,
        id: &EntryId,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, StoreError>> + Send;

    fn list(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, StoreError>> + Send;

    fn create(
        &self,
        title: String,
        data: EntryData,
    ) -> impl Future<Output = Result<ConfigEntry, StoreError>> + Send;

    /// Replace an entry's title and data in place.
    fn update(
        &self,
        id: &EntryId,
        title: String,
        data: EntryData,
    ) -> impl Future<Output = Result<ConfigEntry, StoreError>> + Send;

    /// Ask for the entry to be reloaded so its new data takes effect.
    fn reload(&self, id: &EntryId) -> impl Future<Output = Result<(), StoreError>> + Send;
}
