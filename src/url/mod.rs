//! URL handling module for Site-Mirror
//!
//! This module provides root URL validation, reference resolution, the
//! same-site policy, and the mapping from Target URLs to local file paths.

mod domain;
mod local_path;
mod resolve;

// Re-export main functions
pub use domain::{extract_host, is_same_site};
pub use local_path::{is_document_path, is_stylesheet_path, map_to_local_path, INDEX_DOCUMENT};
pub use resolve::{parse_root_url, resolve_reference, resolve_with_fragment};
