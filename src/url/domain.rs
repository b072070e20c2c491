use url::Url;

/// Extracts the host from a URL
///
/// The `url` crate already lowercases hosts of special schemes, so the
/// result is suitable for direct comparison. Ports are not part of the host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com"));
/// ```
pub fn extract_host(url: &Url) -> Option<&str> {
    url.host_str()
}

/// Same-site policy: strict hostname equality
///
/// Two URLs are same-site when both carry a host and the hosts are exactly
/// equal. Subdomains are different sites and ports are ignored. This is the
/// only scope check in the crate; the extractor and the crawl controller
/// both call it.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::is_same_site;
///
/// let root = Url::parse("http://ex.com/").unwrap();
/// assert!(is_same_site(&root, &Url::parse("http://ex.com/a/b.png").unwrap()));
/// assert!(!is_same_site(&root, &Url::parse("http://cdn.ex.com/a.png").unwrap()));
/// ```
pub fn is_same_site(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(ha), Some(hb)) => ha == hb,
        _ => false,
    }
}
