//! Storage module for persisting the mirror
//!
//! This module handles writing fetched bodies under the output directory and
//! reading them back for the rewrite pass. The crawl controller and the
//! rewriter depend only on the `Storage` trait.

mod disk;
mod traits;

pub use disk::DiskStorage;
pub use traits::{Storage, StorageError, StorageResult};

use std::path::Path;

/// Opens storage rooted at the given output directory
///
/// # Arguments
///
/// * `path` - The output directory (created on first save)
pub fn open_storage(path: &Path) -> DiskStorage {
    DiskStorage::new(path)
}
