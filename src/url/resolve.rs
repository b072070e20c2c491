use crate::{UrlError, UrlResult};
use url::Url;

/// Pseudo-URL schemes that never name a fetchable resource
const SKIPPED_PREFIXES: &[&str] = &["data:", "javascript:"];

/// Parses and validates the root URL of a mirror run
///
/// The root must be absolute, use http or https, and carry a host.
/// Any fragment is dropped so the root's identity matches the identity
/// of references that point back at it.
pub fn parse_root_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim())?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Resolves a raw reference against a base URL, keeping its fragment apart
///
/// Returns `None` if the reference should be dropped:
/// - empty after trimming
/// - pure in-page fragment (`#...`)
/// - `data:` or `javascript:` pseudo-URLs
/// - unparseable relative to `base`
/// - any scheme other than http or https after resolution
///
/// The returned URL has no fragment; the fragment (without `#`) is returned
/// separately so a caller can re-attach it.
pub fn resolve_with_fragment(base: &Url, raw: &str) -> Option<(Url, Option<String>)> {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let lower = raw.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return None;
    }

    let mut resolved = base.join(raw).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    let fragment = resolved.fragment().map(str::to_string);
    resolved.set_fragment(None);
    Some((resolved, fragment))
}

/// Resolves a raw reference into a Target URL
///
/// See [`resolve_with_fragment`] for the rules; the fragment is discarded.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::resolve_reference;
///
/// let base = Url::parse("http://a.com/x/y.html").unwrap();
/// let resolved = resolve_reference(&base, "../z.css").unwrap();
/// assert_eq!(resolved.as_str(), "http://a.com/z.css");
/// ```
pub fn resolve_reference(base: &Url, raw: &str) -> Option<Url> {
    resolve_with_fragment(base, raw).map(|(url, _)| url)
}
