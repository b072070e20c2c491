//! Mirror coordinator - main crawl orchestration logic
//!
//! This module contains the depth-bounded recursive crawl and the hand-off to
//! the rewrite pass:
//! - Validating the root URL
//! - Fetching, classifying and saving each Target URL exactly once
//! - Extracting references and descending into same-site ones
//! - Rewriting saved files once the URL -> local path table is complete

use crate::config::{Config, MirrorConfig};
use crate::crawler::parser::{extract_css_urls, extract_links, inject_base_tag, ExtractedLinks};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::output::MirrorStats;
use crate::rewriter::rewrite_all;
use crate::state::{CrawlState, PageState};
use crate::storage::{open_storage, DiskStorage, Storage};
use crate::url::{is_same_site, is_stylesheet_path, map_to_local_path, parse_root_url};
use crate::MirrorError;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use url::Url;

/// One recursive descent; boxed so the recursion has a finite type
type Descent<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// Main mirror coordinator structure
///
/// Owns all crawl state for one run. Fetches are awaited one at a time, so
/// the Visited Set and the path table are only touched by a single call stack.
pub struct Mirror<S: Storage = DiskStorage> {
    config: MirrorConfig,
    client: Client,
    storage: S,
    state: CrawlState,
    documents_saved: usize,
    resources_saved: usize,
}

impl Mirror<DiskStorage> {
    /// Creates a coordinator writing under the configured output directory
    ///
    /// # Returns
    ///
    /// * `Ok(Mirror)` - Successfully created coordinator
    /// * `Err(MirrorError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, MirrorError> {
        let storage = open_storage(&config.mirror.out_path());
        Self::with_storage(config, storage)
    }
}

impl<S: Storage> Mirror<S> {
    /// Creates a coordinator over an arbitrary storage backend
    pub fn with_storage(config: &Config, storage: S) -> Result<Self, MirrorError> {
        let client = build_http_client(config.mirror.timeout())?;

        Ok(Self {
            config: config.mirror.clone(),
            client,
            storage,
            state: CrawlState::new(),
            documents_saved: 0,
            resources_saved: 0,
        })
    }

    /// The crawl state accumulated so far
    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// The storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Runs a complete mirror: crawl, then rewrite
    ///
    /// 1. Parse and validate the root URL (aborts the run on failure)
    /// 2. Recursively crawl from the root at depth 0
    /// 3. Rewrite every saved document and stylesheet against the now
    ///    complete URL -> local path table
    ///
    /// Per-URL failures never surface here; only an invalid root or a
    /// rewrite I/O failure does.
    pub async fn run(&mut self, root_url: &str) -> Result<MirrorStats, MirrorError> {
        let start = Instant::now();

        let root = parse_root_url(root_url).map_err(|source| MirrorError::InvalidRootUrl {
            url: root_url.to_string(),
            source,
        })?;

        tracing::info!(
            "Starting mirror of {} (depth={}, out={})",
            root,
            self.config.max_depth,
            self.config.out_dir
        );

        self.crawl(&root).await;

        tracing::info!(
            "Crawl phase complete: {} visited, {} saved, {} failed",
            self.state.visited_count(),
            self.state.count(PageState::Saved),
            self.state.count(PageState::Failed)
        );

        let rewrite = rewrite_all(&self.storage, self.state.local_paths())?;

        tracing::info!(
            "Rewrite phase complete: {} references in {} files",
            rewrite.references_rewritten,
            rewrite.files_rewritten
        );

        Ok(MirrorStats::collect(
            &root,
            &self.config,
            &self.state,
            self.documents_saved,
            self.resources_saved,
            &rewrite,
            start.elapsed(),
        ))
    }

    /// Runs only the crawl phase from `root`
    ///
    /// Populates the Visited Set and the path table. Call before any rewrite.
    pub async fn crawl(&mut self, root: &Url) {
        self.descend(root.clone(), root, 0).await;
    }

    /// Fetches `url` and recursively descends into its same-site references
    ///
    /// # Steps
    ///
    /// 1. Return if `depth` exceeds the configured maximum
    /// 2. Return if `url` is already visited; otherwise mark it in flight
    /// 3. Fetch; on transport error or status >= 400 mark failed and return
    /// 4. Gzip-decode the body when `Content-Encoding` says so, keeping the
    ///    raw bytes if decoding fails (done by [`fetch_url`])
    /// 5. Classify as a document by `text/html` content type
    /// 6. Inject a base tag into documents, save, record the local path
    /// 7. Descend at `depth + 1` into resources then page links of documents,
    ///    or into `url(...)` references of stylesheets
    fn descend<'a>(&'a mut self, url: Url, root: &'a Url, depth: u32) -> Descent<'a> {
        Box::pin(async move {
            if depth > self.config.max_depth {
                tracing::debug!(depth, url = %url, "Depth limit reached, skipping");
                return;
            }

            if !self.state.begin(&url) {
                tracing::debug!(depth, url = %url, "Already visited, skipping");
                return;
            }

            tracing::info!(depth, url = %url, "Downloading");

            let (content_type, body) = match fetch_url(&self.client, &url).await {
                FetchResult::Success {
                    status_code,
                    content_type,
                    body,
                } => {
                    tracing::debug!(depth, url = %url, status_code, bytes = body.len(), "Fetched");
                    (content_type, body)
                }
                FetchResult::HttpError { status_code } => {
                    tracing::warn!(depth, url = %url, status_code, "Bad status, skipping subtree");
                    self.fail(&url);
                    return;
                }
                FetchResult::NetworkError { error, timed_out } => {
                    tracing::warn!(depth, url = %url, timed_out, "Fetch failed: {}", error);
                    self.fail(&url);
                    return;
                }
            };

            let is_document = FetchResult::is_document(&content_type);
            let local_path = map_to_local_path(&url, is_document);
            let body = if is_document {
                inject_base_tag(&body)
            } else {
                body
            };

            if let Err(e) = self.storage.save(&local_path, &body) {
                tracing::warn!(depth, url = %url, path = %local_path, "Save failed: {}", e);
                self.fail(&url);
                return;
            }

            if let Err(e) = self.state.mark_saved(&url, &local_path) {
                tracing::error!(depth, url = %url, "{}", e);
                return;
            }

            if is_document {
                self.documents_saved += 1;
            } else {
                self.resources_saved += 1;
            }
            tracing::debug!(depth, url = %url, path = %local_path, "Saved");

            let next: Vec<Url> = if is_document {
                let links = extract_links(&url, &body);
                self.record_external(&links);
                links.resources.into_iter().chain(links.pages).collect()
            } else if is_stylesheet_path(&local_path) {
                let links = extract_css_urls(&url, &body);
                self.record_external(&links);
                links.resources
            } else {
                Vec::new()
            };

            for next_url in next {
                if !is_same_site(root, &next_url) {
                    tracing::debug!(depth, url = %next_url, "Off-site, not following");
                    continue;
                }
                if self.state.is_visited(next_url.as_str()) {
                    continue;
                }
                self.descend(next_url, root, depth + 1).await;
            }
        })
    }

    fn fail(&mut self, url: &Url) {
        if let Err(e) = self.state.mark_failed(url) {
            tracing::error!(url = %url, "{}", e);
        }
    }

    fn record_external(&mut self, links: &ExtractedLinks) {
        for external in &links.external {
            tracing::debug!(url = %external, "Discovered off-site reference");
            self.state.record_external(external);
        }
    }
}

/// Runs a complete mirror operation with on-disk storage
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::Config;
/// use site_mirror::crawler::mirror;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = mirror(&Config::default(), "https://example.com/").await?;
/// println!("{} files saved", stats.saved());
/// # Ok(())
/// # }
/// ```
pub async fn mirror(config: &Config, root_url: &str) -> Result<MirrorStats, MirrorError> {
    let mut coordinator = Mirror::new(config)?;
    coordinator.run(root_url).await
}
