//! Filesystem storage implementation
//!
//! This module provides a directory-tree implementation of the Storage trait.

use crate::storage::traits::{Storage, StorageError, StorageResult};
use std::fs;
use std::path::PathBuf;

/// Storage backend rooted at an output directory
#[derive(Debug, Clone)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    /// Creates a storage backend rooted at `root`
    ///
    /// The directory is created lazily by the first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Converts a slash-separated relative path into a path under the root
    ///
    /// Leading separators are stripped; `..` segments are rejected so the
    /// result can never escape the root.
    fn resolve(&self, relative_path: &str) -> StorageResult<PathBuf> {
        let trimmed = relative_path.trim_start_matches(['/', '\\']);

        let mut full = self.root.clone();
        let mut pushed = false;
        for segment in trimmed.split(['/', '\\']) {
            match segment {
                "" | "." => continue,
                ".." => return Err(StorageError::UnsafePath(relative_path.to_string())),
                s => {
                    full.push(s);
                    pushed = true;
                }
            }
        }

        if !pushed {
            return Err(StorageError::UnsafePath(relative_path.to_string()));
        }
        Ok(full)
    }
}

impl Storage for DiskStorage {
    fn save(&self, relative_path: &str, contents: &[u8]) -> StorageResult<PathBuf> {
        let full = self.resolve(relative_path)?;

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&full, contents).map_err(|source| StorageError::Io {
            path: full.clone(),
            source,
        })?;

        Ok(full)
    }

    fn load(&self, relative_path: &str) -> StorageResult<Vec<u8>> {
        let full = self.resolve(relative_path)?;
        fs::read(&full).map_err(|source| StorageError::Io { path: full, source })
    }
}
