//! JSON file helpers shared by the file-backed stores.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::StoreError;

/// Read and parse a JSON file. A missing file is `Ok(None)`.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::Io {
                message: format!("failed to read {}: {}", path.display(), e),
            });
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| StoreError::Json {
            message: format!("failed to parse {}: {}", path.display(), e),
        })
}

/// Write a value as pretty JSON, replacing the file atomically.
///
/// Creates parent directories if they don't exist.
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::Io {
                message: format!("failed to create storage directory: {}", e),
            })?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Json {
        message: format!("failed to serialize: {}", e),
    })?;

    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| StoreError::Io {
            message: format!("failed to write {}: {}", tmp.display(), e),
        })?;

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::Io {
            message: format!("failed to replace {}: {}", path.display(), e),
        })
}
