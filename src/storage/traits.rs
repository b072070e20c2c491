//! Storage traits and error types
//!
//! This module defines the trait interface for mirror storage backends and
//! associated error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unsafe relative path: {0}")]
    UnsafePath(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Paths are slash-separated and relative to the storage root, exactly as
/// produced by [`crate::url::map_to_local_path`].
pub trait Storage {
    /// Writes `contents` at `relative_path`, creating parent directories
    ///
    /// Overwrites any existing file. Returns the full path written.
    fn save(&self, relative_path: &str, contents: &[u8]) -> StorageResult<PathBuf>;

    /// Reads the file at `relative_path`
    fn load(&self, relative_path: &str) -> StorageResult<Vec<u8>>;
}
