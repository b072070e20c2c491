//! Run statistics collection and display

use crate::config::MirrorConfig;
use crate::rewriter::RewriteSummary;
use crate::state::{CrawlState, PageState};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Statistics for one completed mirror run
#[derive(Debug, Clone)]
pub struct MirrorStats {
    pub root_url: String,
    pub out_dir: PathBuf,
    pub max_depth: u32,

    /// URLs in the Visited Set
    pub visited: usize,
    pub documents_saved: usize,
    pub resources_saved: usize,
    pub failed: usize,

    /// Distinct off-site references seen in documents
    pub external_references: usize,

    pub files_rewritten: usize,
    pub references_rewritten: usize,

    /// Every URL that ended in the failed state, sorted
    pub failed_urls: Vec<String>,

    pub elapsed: Duration,
}

impl MirrorStats {
    /// Gathers statistics from the state of a finished run
    pub fn collect(
        root: &Url,
        config: &MirrorConfig,
        state: &CrawlState,
        documents_saved: usize,
        resources_saved: usize,
        rewrite: &RewriteSummary,
        elapsed: Duration,
    ) -> Self {
        Self {
            root_url: root.to_string(),
            out_dir: config.out_path(),
            max_depth: config.max_depth,
            visited: state.visited_count(),
            documents_saved,
            resources_saved,
            failed: state.count(PageState::Failed),
            external_references: state.external().len(),
            files_rewritten: rewrite.files_rewritten,
            references_rewritten: rewrite.references_rewritten,
            failed_urls: state.urls_in(PageState::Failed),
            elapsed,
        }
    }

    /// Total files written during the crawl
    pub fn saved(&self) -> usize {
        self.documents_saved + self.resources_saved
    }

    /// Returns the share of visited URLs that were saved, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.visited == 0 {
            return 0.0;
        }
        (self.saved() as f64 / self.visited as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &MirrorStats) {
    println!("=== Mirror Statistics ===\n");

    println!("Run:");
    println!("  Root URL: {}", stats.root_url);
    println!("  Output directory: {}", stats.out_dir.display());
    println!("  Max depth: {}", stats.max_depth);
    println!();

    println!("Crawl:");
    println!("  URLs visited: {}", stats.visited);
    println!("  Documents saved: {}", stats.documents_saved);
    println!("  Resources saved: {}", stats.resources_saved);
    println!("  Failed: {}", stats.failed);
    println!("  Off-site references: {}", stats.external_references);
    println!();

    println!("Rewrite:");
    println!("  Files rewritten: {}", stats.files_rewritten);
    println!("  References rewritten: {}", stats.references_rewritten);
    println!();

    if !stats.failed_urls.is_empty() {
        println!("Failed URLs ({}):", stats.failed_urls.len());
        for url in &stats.failed_urls {
            println!("  - {}", url);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs saved)",
        stats.success_rate(),
        stats.saved(),
        stats.visited
    );
}
