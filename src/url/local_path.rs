use url::Url;

/// File name given to documents whose URL names a directory
pub const INDEX_DOCUMENT: &str = "index.html";

/// File name given to resources whose URL has no usable path segment
const FALLBACK_RESOURCE_NAME: &str = "index";

/// Maps a Target URL to its on-disk path relative to the output root
///
/// # Mapping Rules
///
/// 1. The host is the first path segment
/// 2. Documents whose path is empty, ends in `/`, or whose last segment has
///    no extension get `index.html` appended
/// 3. Resources whose path is empty or ends in `/` reuse their last path
///    segment as the file name (or `index` at the host root)
/// 4. Empty, `.` and `..` segments are discarded, so the result never has a
///    leading `/` and never escapes the output root
/// 5. The query string and fragment do not take part in the mapping
///
/// The result always uses `/` separators regardless of host OS, and the
/// function is pure: the same input always yields the same path.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::map_to_local_path;
///
/// let page = Url::parse("http://ex.com/about").unwrap();
/// assert_eq!(map_to_local_path(&page, true), "ex.com/about/index.html");
///
/// let logo = Url::parse("http://ex.com/img/logo.png").unwrap();
/// assert_eq!(map_to_local_path(&logo, false), "ex.com/img/logo.png");
/// ```
pub fn map_to_local_path(url: &Url, is_document: bool) -> String {
    let host = url.host_str().unwrap_or("unknown-host");
    let path = url.path();
    let names_directory = path.is_empty() || path.ends_with('/');

    let mut segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();

    if is_document {
        let has_extension = segments.last().is_some_and(|s| s.contains('.'));
        if names_directory || !has_extension {
            segments.push(INDEX_DOCUMENT);
        }
    } else if names_directory {
        let name = segments.last().copied().unwrap_or(FALLBACK_RESOURCE_NAME);
        segments.push(name);
    }

    std::iter::once(host)
        .chain(segments)
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns true if a local path names an HTML document
pub fn is_document_path(local_path: &str) -> bool {
    matches!(extension_of(local_path), Some("html") | Some("htm"))
}

/// Returns true if a local path names a stylesheet
pub fn is_stylesheet_path(local_path: &str) -> bool {
    matches!(extension_of(local_path), Some("css"))
}

/// Returns the lowercase extension of the last segment of a slash path
fn extension_of(local_path: &str) -> Option<&'static str> {
    let name = local_path.rsplit('/').next()?;
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "html" => Some("html"),
        "htm" => Some("htm"),
        "css" => Some("css"),
        _ => None,
    }
}
