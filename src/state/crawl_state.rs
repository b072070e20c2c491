use crate::state::PageState;
use crate::MirrorError;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use url::Url;

/// Explicit state owned by a single mirror run
///
/// Holds the Visited Set, the per-URL state machine, the URL -> local path
/// table consumed by the rewriter, and the off-site references seen along the
/// way. Only one call stack mutates it, so no locking is involved.
#[derive(Debug, Default, Clone)]
pub struct CrawlState {
    /// State of every URL that has left `Unseen`
    pages: HashMap<String, PageState>,

    /// URL -> slash-separated path relative to the output root
    local_paths: BTreeMap<String, String>,

    /// Off-site references discovered in documents (never fetched)
    external: BTreeSet<String>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state of a URL
    pub fn state_of(&self, url: &str) -> PageState {
        self.pages.get(url).copied().unwrap_or(PageState::Unseen)
    }

    /// Returns true if the URL is in the Visited Set
    pub fn is_visited(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    /// Moves a URL from `Unseen` to `InFlight`, inserting it into the Visited Set
    ///
    /// Returns `false` if the URL was already visited, in which case nothing
    /// changes and the caller must not fetch it.
    pub fn begin(&mut self, url: &Url) -> bool {
        if self.is_visited(url.as_str()) {
            return false;
        }
        self.pages.insert(url.to_string(), PageState::InFlight);
        true
    }

    /// Marks an in-flight URL as saved and records its local path
    pub fn mark_saved(&mut self, url: &Url, local_path: &str) -> Result<(), MirrorError> {
        self.transition(url, PageState::Saved)?;
        self.local_paths
            .insert(url.to_string(), local_path.to_string());
        Ok(())
    }

    /// Marks an in-flight URL as failed; it never enters the path table
    pub fn mark_failed(&mut self, url: &Url) -> Result<(), MirrorError> {
        self.transition(url, PageState::Failed)
    }

    /// Records an off-site reference
    pub fn record_external(&mut self, url: &Url) {
        self.external.insert(url.to_string());
    }

    /// The URL -> local path table
    pub fn local_paths(&self) -> &BTreeMap<String, String> {
        &self.local_paths
    }

    /// Looks up the local path of a saved URL
    pub fn local_path(&self, url: &str) -> Option<&str> {
        self.local_paths.get(url).map(String::as_str)
    }

    /// Off-site references discovered during the crawl
    pub fn external(&self) -> &BTreeSet<String> {
        &self.external
    }

    /// Number of URLs in the Visited Set
    pub fn visited_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of URLs in the given state
    pub fn count(&self, state: PageState) -> usize {
        self.pages.values().filter(|s| **s == state).count()
    }

    /// URLs currently in the given state, sorted
    pub fn urls_in(&self, state: PageState) -> Vec<String> {
        let mut urls: Vec<String> = self
            .pages
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(url, _)| url.clone())
            .collect();
        urls.sort();
        urls
    }

    fn transition(&mut self, url: &Url, to: PageState) -> Result<(), MirrorError> {
        let from = self.state_of(url.as_str());
        if !from.can_transition_to(to) {
            return Err(MirrorError::InvalidTransition {
                url: url.to_string(),
                from,
                to,
            });
        }
        self.pages.insert(url.to_string(), to);
        Ok(())
    }
}
