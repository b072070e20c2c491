//! Configuration module for Site-Mirror
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and layering command-line overrides on top of them.
//!
//! # Example
//!
//! ```no_run
//! use site_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Mirror will use max depth: {}", config.mirror.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, MirrorConfig, Overrides, DEFAULT_MAX_DEPTH, DEFAULT_OUT_DIR, DEFAULT_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, resolve_config};
