/// Computes the path from the directory of `from_file` to `to_file`
///
/// Both arguments are slash-separated paths relative to the same root, as
/// stored in the URL -> local path table. The result uses `/` separators
/// and `..` to climb out of `from_file`'s directory.
///
/// # Examples
///
/// ```
/// use site_mirror::rewriter::relative_path;
///
/// assert_eq!(relative_path("ex.com/index.html", "ex.com/logo.png"), "logo.png");
/// assert_eq!(relative_path("ex.com/about/index.html", "ex.com/s.css"), "../s.css");
/// ```
pub fn relative_path(from_file: &str, to_file: &str) -> String {
    let from: Vec<&str> = from_file.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = to_file.split('/').filter(|s| !s.is_empty()).collect();

    let from_dir = &from[..from.len().saturating_sub(1)];

    // The target's file name is never absorbed into the common prefix
    let common = from_dir
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count()
        .min(to.len().saturating_sub(1));

    let mut parts: Vec<&str> = vec![".."; from_dir.len() - common];
    parts.extend_from_slice(&to[common..]);

    if parts.is_empty() {
        return ".".to_string();
    }
    parts.join("/")
}
