//! Persistence errors.

use thiserror::Error;

/// Failure talking to a store or decoding a saved blob.
///
/// Never fatal to gameplay: sessions log it and carry on.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage I/O failed for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode or decode record for key {key:?}: {source}")]
    Codec {
        key: String,
        #[source]
        source: bincode::Error,
    },

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

impl PersistError {
    /// Key the failed operation was for.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            PersistError::Io { key, .. } | PersistError::Codec { key, .. } => key,
            PersistError::InvalidKey(key) => key,
        }
    }
}
