//! Site-Mirror: an offline website mirror
//!
//! This crate fetches a website from a root URL within a bounded link depth,
//! saves every same-site page and asset under a per-host directory tree, and
//! then rewrites intra-site references so the copy is browsable from disk.

pub mod config;
pub mod crawler;
pub mod output;
pub mod rewriter;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid root URL '{url}': {source}")]
    InvalidRootUrl { url: String, source: UrlError },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Rewrite of {path} failed: {source}")]
    Rewrite {
        path: String,
        source: storage::StorageError,
    },

    #[error("Invalid state transition for {url}: {from} -> {to}")]
    InvalidTransition {
        url: String,
        from: state::PageState,
        to: state::PageState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Site-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{mirror, Mirror};
pub use output::MirrorStats;
pub use state::{CrawlState, PageState};
pub use url::{is_same_site, map_to_local_path, parse_root_url};
