//! Store error types.

use super::entries::EntryId;

/// Errors from the token store or the configuration-entry store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("storage I/O error: {message}")]
    Io { message: String },

    /// The backing file could not be parsed or written as JSON
    #[error("storage JSON error: {message}")]
    Json { message: String },

    /// The backing file belongs to another version or namespace
    #[error("unsupported storage file: version {version}, key {key:?}")]
    Version { version: u32, key: String },

    /// No entry with the requested ID
    #[error("config entry {0} not found")]
    EntryNotFound(EntryId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::Io {
            message: "permission denied".into(),
        };
        assert_eq!(err.to_string(), "storage I/O error: permission denied");

        let err = StoreError::Version {
            version: 2,
            key: "other".into(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported storage file: version 2, key \"other\""
        );
    }
}
