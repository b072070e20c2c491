//! Markdown report generation
//!
//! This module renders a finished run's statistics as a human-readable
//! markdown report.

use crate::output::MirrorStats;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Off-site and failed URL listings are cut after this many entries
const MAX_LISTED_URLS: usize = 50;

/// Writes a markdown report for a finished run
///
/// # Arguments
///
/// * `stats` - The run statistics
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(std::io::Error)` - Failed to create or write the file
pub fn generate_markdown_report(stats: &MirrorStats, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_report(stats, Utc::now());

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats run statistics as markdown, stamped with `generated_at`
pub fn format_markdown_report(stats: &MirrorStats, generated_at: DateTime<Utc>) -> String {
    let mut md = String::new();

    md.push_str("# Site Mirror Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root URL**: {}\n", stats.root_url));
    md.push_str(&format!(
        "- **Output Directory**: {}\n",
        stats.out_dir.display()
    ));
    md.push_str(&format!("- **Max Depth**: {}\n", stats.max_depth));
    md.push_str(&format!(
        "- **Generated**: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n\n",
        stats.elapsed.as_secs_f64()
    ));

    md.push_str("## Crawl\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Visited | {} |\n", stats.visited));
    md.push_str(&format!("| Documents Saved | {} |\n", stats.documents_saved));
    md.push_str(&format!("| Resources Saved | {} |\n", stats.resources_saved));
    md.push_str(&format!("| Failed | {} |\n", stats.failed));
    md.push_str(&format!(
        "| Off-site References | {} |\n\n",
        stats.external_references
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    md.push_str("## Rewrite\n\n");
    md.push_str(&format!("- **Files Rewritten**: {}\n", stats.files_rewritten));
    md.push_str(&format!(
        "- **References Rewritten**: {}\n\n",
        stats.references_rewritten
    ));

    if !stats.failed_urls.is_empty() {
        md.push_str("## Failed URLs\n\n");
        for url in stats.failed_urls.iter().take(MAX_LISTED_URLS) {
            md.push_str(&format!("- {}\n", url));
        }
        if stats.failed_urls.len() > MAX_LISTED_URLS {
            md.push_str(&format!(
                "\n... and {} more\n",
                stats.failed_urls.len() - MAX_LISTED_URLS
            ));
        }
        md.push('\n');
    }

    md
}
