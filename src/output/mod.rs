//! Output module for run summaries and reports
//!
//! This module handles:
//! - Collecting statistics from a finished mirror run
//! - Printing them to the console
//! - Writing an optional markdown report

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use stats::{print_statistics, MirrorStats};
