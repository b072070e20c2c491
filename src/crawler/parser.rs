//! HTML and CSS reference extraction
//!
//! This module finds every reference a fetched body makes to other URLs:
//! - Page links (`<a href>`)
//! - Embedded resources (images, scripts, frames, media, icons, stylesheets,
//!   manifests, `data-*` and `poster` attributes, asset-looking `<meta>` content)
//! - Stylesheet-internal resources (CSS `url(...)` in inline styles and `.css` files)
//!
//! It also prepares documents for saving by injecting a `<base href="./">` tag.

use crate::url::{is_same_site, resolve_reference};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

static ANY_ELEMENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("*").expect("universal selector is valid"));

/// CSS `url(...)` with a double-quoted, single-quoted, or bare argument
pub(crate) static CSS_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i-u)url\(\s*(?:"([^"]*)"|'([^']*)'|([^'")\s]+))\s*\)"#)
        .expect("css url pattern is valid")
});

static HEAD_OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u)<head(?:\s[^>]*)?>").expect("head pattern is valid"));

static BASE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u)<base[\s/>]").expect("base pattern is valid"));

/// Tag injected into documents that have no `<base>` of their own
pub const INJECTED_BASE_TAG: &str = "<base href=\"./\">";

/// Element names whose `src` attribute names an embedded resource
const SRC_ELEMENTS: &[&str] = &["img", "script", "iframe", "source", "audio", "video"];

/// Substrings that make a `<meta content>` value look like an asset
const META_ASSET_MARKERS: &[&str] = &[".png", ".json", ".svg"];

/// What a reference was found as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `<a href>`: a page to descend into
    PageLink,
    /// Attribute of an embedding element
    Resource,
    /// Argument of a CSS `url(...)`
    StylesheetResource,
}

/// An unresolved reference found in markup or CSS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub raw: String,
    pub kind: ReferenceKind,
}

impl Reference {
    fn new(raw: &str, kind: ReferenceKind) -> Self {
        Self {
            raw: raw.to_string(),
            kind,
        }
    }
}

/// Resolved references of one document, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Same-site page links
    pub pages: Vec<Url>,

    /// Same-site resources (embedded and stylesheet-internal)
    pub resources: Vec<Url>,

    /// Off-site references of any kind
    pub external: Vec<Url>,
}

/// Extracts same-site page links and resources from an HTML document
///
/// # Extraction Rules
///
/// - `<a href>` is a page link
/// - `<img|script|iframe|source|audio|video src>` and `<object|embed data>`
///   are resources, as is any `poster` attribute and any `data-*` attribute
///   whose value contains `/` or `.`
/// - `<link href>` is a resource if `rel` contains `icon`, equals
///   `stylesheet`, `manifest` or `mask-icon`, or the href ends in `.svg`
/// - `<meta content>` is a resource if it contains `.png`, `.json` or `.svg`
/// - every CSS `url(...)` in the raw bytes is a resource
///
/// Each reference is trimmed, resolved against `base`, stripped of its
/// fragment, and dropped if empty, `data:`, `javascript:`, a pure fragment,
/// or not http(s). Off-site references land in `external`. Each output list
/// is deduplicated by absolute URL string.
///
/// # Example
///
/// ```
/// use site_mirror::crawler::extract_links;
/// use url::Url;
///
/// let base = Url::parse("http://ex.com/").unwrap();
/// let html = br#"<a href="/about">About</a><img src="logo.png">"#;
/// let links = extract_links(&base, html);
/// assert_eq!(links.pages[0].as_str(), "http://ex.com/about");
/// assert_eq!(links.resources[0].as_str(), "http://ex.com/logo.png");
/// ```
pub fn extract_links(base: &Url, body: &[u8]) -> ExtractedLinks {
    let mut collector = LinkCollector::new(base);
    for reference in collect_references(body) {
        collector.add(&reference);
    }
    collector.finish()
}

/// Extracts same-site `url(...)` references from a stylesheet body
///
/// References resolve against the stylesheet's own URL.
pub fn extract_css_urls(base: &Url, body: &[u8]) -> ExtractedLinks {
    let mut collector = LinkCollector::new(base);
    for raw in css_url_arguments(body) {
        collector.add(&Reference::new(&raw, ReferenceKind::StylesheetResource));
    }
    collector.finish()
}

/// Collects every unresolved reference in an HTML document
pub fn collect_references(body: &[u8]) -> Vec<Reference> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);
    let mut references = Vec::new();

    for element in document.select(&ANY_ELEMENT) {
        let el = element.value();
        let name = el.name();

        match name {
            "a" => {
                if let Some(href) = el.attr("href") {
                    references.push(Reference::new(href, ReferenceKind::PageLink));
                }
            }
            "link" => {
                if let Some(href) = el.attr("href") {
                    if is_resource_link(el.attr("rel").unwrap_or(""), href) {
                        references.push(Reference::new(href, ReferenceKind::Resource));
                    }
                }
            }
            "meta" => {
                if let Some(content) = el.attr("content") {
                    let lower = content.to_ascii_lowercase();
                    if META_ASSET_MARKERS.iter().any(|m| lower.contains(m)) {
                        references.push(Reference::new(content, ReferenceKind::Resource));
                    }
                }
            }
            "object" | "embed" => {
                if let Some(data) = el.attr("data") {
                    references.push(Reference::new(data, ReferenceKind::Resource));
                }
            }
            n if SRC_ELEMENTS.contains(&n) => {
                if let Some(src) = el.attr("src") {
                    references.push(Reference::new(src, ReferenceKind::Resource));
                }
            }
            _ => {}
        }

        for (attr, value) in el.attrs() {
            let data_path =
                attr.starts_with("data-") && (value.contains('/') || value.contains('.'));
            if data_path || attr == "poster" {
                references.push(Reference::new(value, ReferenceKind::Resource));
            }
        }
    }

    references.extend(
        css_url_arguments(body)
            .into_iter()
            .map(|raw| Reference::new(&raw, ReferenceKind::StylesheetResource)),
    );

    references
}

/// Injects `<base href="./">` right after the opening `<head>` tag
///
/// Documents that already carry a `<base>` element, or that have no
/// `<head>` tag, are returned unchanged.
pub fn inject_base_tag(body: &[u8]) -> Vec<u8> {
    if BASE_TAG.is_match(body) {
        return body.to_vec();
    }

    let Some(head) = HEAD_OPEN_TAG.find(body) else {
        return body.to_vec();
    };

    let mut out = Vec::with_capacity(body.len() + INJECTED_BASE_TAG.len() + 1);
    out.extend_from_slice(&body[..head.end()]);
    out.push(b'\n');
    out.extend_from_slice(INJECTED_BASE_TAG.as_bytes());
    out.extend_from_slice(&body[head.end()..]);
    out
}

/// Returns the raw argument of every CSS `url(...)` in `body`
fn css_url_arguments(body: &[u8]) -> Vec<String> {
    CSS_URL
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .filter_map(|m| std::str::from_utf8(m.as_bytes()).ok())
        .map(str::to_string)
        .collect()
}

/// Decides whether a `<link>` element points at a resource to mirror
fn is_resource_link(rel: &str, href: &str) -> bool {
    let rel = rel.trim().to_ascii_lowercase();
    rel.contains("icon")
        || rel == "stylesheet"
        || rel == "manifest"
        || rel == "mask-icon"
        || href.trim().to_ascii_lowercase().ends_with(".svg")
}

/// Resolves references and sorts them into deduplicated output lists
struct LinkCollector<'a> {
    base: &'a Url,
    links: ExtractedLinks,
    seen_pages: HashSet<String>,
    seen_resources: HashSet<String>,
    seen_external: HashSet<String>,
}

impl<'a> LinkCollector<'a> {
    fn new(base: &'a Url) -> Self {
        Self {
            base,
            links: ExtractedLinks::default(),
            seen_pages: HashSet::new(),
            seen_resources: HashSet::new(),
            seen_external: HashSet::new(),
        }
    }

    fn add(&mut self, reference: &Reference) {
        let Some(url) = resolve_reference(self.base, &reference.raw) else {
            return;
        };

        let (seen, list) = if !is_same_site(self.base, &url) {
            (&mut self.seen_external, &mut self.links.external)
        } else if reference.kind == ReferenceKind::PageLink {
            (&mut self.seen_pages, &mut self.links.pages)
        } else {
            (&mut self.seen_resources, &mut self.links.resources)
        };

        if seen.insert(url.to_string()) {
            list.push(url);
        }
    }

    fn finish(self) -> ExtractedLinks {
        self.links
    }
}
