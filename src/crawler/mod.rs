//! Crawler module for fetching and descending through a site
//!
//! This module contains the core mirroring logic, including:
//! - HTTP fetching with gzip handling
//! - HTML and CSS reference extraction
//! - The depth-bounded recursive crawl and its hand-off to the rewriter

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{mirror, Mirror};
pub use fetcher::{build_http_client, decode_gzip_or_raw, fetch_url, FetchResult};
pub use parser::{
    collect_references, extract_css_urls, extract_links, inject_base_tag, ExtractedLinks,
    Reference, ReferenceKind, INJECTED_BASE_TAG,
};

pub(crate) use parser::CSS_URL;
