//! State module for tracking mirror progress
//!
//! # Components
//!
//! - `PageState`: the per-URL state machine (unseen, in flight, saved, failed)
//! - `CrawlState`: the Visited Set and URL -> local path table of one run

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_state::PageState;
