//! Offline reference rewriting
//!
//! Runs once the crawl is complete. Every saved document and stylesheet is
//! reloaded and each reference whose target URL has a local path is replaced
//! by the relative path between the two files:
//! - `href`, `src`, `action`, `poster`, `data`, `content` and `data-*`
//!   attribute values in documents
//! - CSS `url(...)` arguments in documents and stylesheets
//!
//! References to URLs that were never saved (off-site, failed, past the depth
//! limit) are left exactly as written. `<base>` tags are never touched.

mod relative;

pub use relative::relative_path;

use crate::crawler::CSS_URL;
use crate::storage::Storage;
use crate::url::{is_document_path, is_stylesheet_path, resolve_with_fragment};
use crate::MirrorError;
use once_cell::sync::Lazy;
use regex::bytes::{Captures, Regex};
use std::collections::BTreeMap;
use std::ops::Range;
use url::Url;

/// Quoted attribute that may name a saved file
///
/// Covers every attribute the extractor follows, plus form `action`. Values
/// that do not resolve to a saved URL (plain `content` text, say) are left alone.
static REF_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i-u)\b((?:href|src|action|poster|data|content|data-[a-z0-9_.:-]+)\s*=\s*)(?:"([^"]*)"|'([^']*)')"#,
    )
    .expect("attribute pattern is valid")
});

static BASE_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u)<base\b[^>]*>").expect("base element pattern is valid"));

/// Value of the injected base tag; must keep resolving to the file's own directory
const BASE_HREF_VALUE: &str = "./";

/// Totals for one rewrite pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Files whose content changed and were saved again
    pub files_rewritten: usize,
    /// Individual references replaced across all files
    pub references_rewritten: usize,
}

/// Rewrites every saved document and stylesheet in `table`
///
/// `table` maps Target URL -> slash-separated local path, as recorded during
/// the crawl. Files are only written back when at least one reference
/// changed.
///
/// # Errors
///
/// Returns `MirrorError::Rewrite` if a saved file cannot be read back or
/// written. Entries whose URL no longer parses are skipped.
pub fn rewrite_all<S: Storage>(
    storage: &S,
    table: &BTreeMap<String, String>,
) -> Result<RewriteSummary, MirrorError> {
    let mut summary = RewriteSummary::default();

    for (source, local_path) in table {
        let is_document = is_document_path(local_path);
        if !is_document && !is_stylesheet_path(local_path) {
            continue;
        }

        let Ok(base) = Url::parse(source) else {
            tracing::warn!(url = %source, "Unparseable URL in path table, not rewriting");
            continue;
        };

        let original = storage
            .load(local_path)
            .map_err(|source| MirrorError::Rewrite {
                path: local_path.clone(),
                source,
            })?;

        let rewriter = FileRewriter {
            base: &base,
            own_path: local_path,
            table,
        };
        let (content, count) = if is_document {
            rewriter.rewrite_document(&original)
        } else {
            rewriter.rewrite_css(&original)
        };

        if count == 0 {
            continue;
        }

        storage
            .save(local_path, &content)
            .map_err(|source| MirrorError::Rewrite {
                path: local_path.clone(),
                source,
            })?;

        tracing::debug!(path = %local_path, count, "Rewrote references");
        summary.files_rewritten += 1;
        summary.references_rewritten += count;
    }

    Ok(summary)
}

/// Rewrites the references of a single file
struct FileRewriter<'a> {
    base: &'a Url,
    own_path: &'a str,
    table: &'a BTreeMap<String, String>,
}

impl FileRewriter<'_> {
    /// Rewrites attribute values, then CSS `url(...)` arguments
    fn rewrite_document(&self, body: &[u8]) -> (Vec<u8>, usize) {
        let base_tags: Vec<Range<usize>> =
            BASE_ELEMENT.find_iter(body).map(|m| m.range()).collect();

        let mut count = 0;
        let attributes = REF_ATTRIBUTE.replace_all(body, |caps: &Captures| {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let inside_base = base_tags
                .iter()
                .any(|tag| tag.start <= whole.start && whole.end <= tag.end);

            let (quote, value) = match (caps.get(2), caps.get(3)) {
                (Some(v), _) => (b'"', v.as_bytes()),
                (None, Some(v)) => (b'\'', v.as_bytes()),
                (None, None) => return caps[0].to_vec(),
            };

            if inside_base || value == BASE_HREF_VALUE.as_bytes() {
                return caps[0].to_vec();
            }

            match self.replacement(value) {
                Some(new_value) => {
                    count += 1;
                    let mut out = caps[1].to_vec();
                    out.push(quote);
                    out.extend_from_slice(new_value.as_bytes());
                    out.push(quote);
                    out
                }
                None => caps[0].to_vec(),
            }
        });

        let (content, css_count) = self.rewrite_css(&attributes);
        (content, count + css_count)
    }

    /// Rewrites `url(...)` arguments, keeping the original quoting
    fn rewrite_css(&self, body: &[u8]) -> (Vec<u8>, usize) {
        let mut count = 0;
        let content = CSS_URL.replace_all(body, |caps: &Captures| {
            let (quote, value) = match (caps.get(1), caps.get(2), caps.get(3)) {
                (Some(v), _, _) => (Some(b'"'), v.as_bytes()),
                (None, Some(v), _) => (Some(b'\''), v.as_bytes()),
                (None, None, Some(v)) => (None, v.as_bytes()),
                (None, None, None) => return caps[0].to_vec(),
            };

            match self.replacement(value) {
                Some(new_value) => {
                    count += 1;
                    let mut out = b"url(".to_vec();
                    out.extend(quote);
                    out.extend_from_slice(new_value.as_bytes());
                    out.extend(quote);
                    out.push(b')');
                    out
                }
                None => caps[0].to_vec(),
            }
        });
        (content.into_owned(), count)
    }

    /// The relative local path for a raw reference, if its target was saved
    fn replacement(&self, raw: &[u8]) -> Option<String> {
        let raw = std::str::from_utf8(raw).ok()?;
        let (target, fragment) = resolve_with_fragment(self.base, raw)?;
        let target_path = self.table.get(target.as_str())?;

        let mut relative = relative_path(self.own_path, target_path);
        if let Some(fragment) = fragment {
            relative.push('#');
            relative.push_str(&fragment);
        }

        // Already pointing at the right file
        if relative == raw.trim() {
            return None;
        }
        Some(relative)
    }
}
