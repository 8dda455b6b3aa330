//! Upload filename sanitization.

/// Reduce an uploaded filename to a safe single path component.
///
/// Directory components are dropped, characters outside `[A-Za-z0-9._-]`
/// become `_`, and leading dots are removed. Returns `None` when nothing
/// usable remains.
///
/// # Examples
///
/// ```
/// use tsukumo::server::secure_filename;
///
/// assert_eq!(secure_filename("../../etc/core.tar.gz").as_deref(), Some("core.tar.gz"));
/// assert_eq!(secure_filename("my package.tar").as_deref(), Some("my_package.tar"));
/// assert_eq!(secure_filename(".hidden.tar").as_deref(), Some("hidden.tar"));
/// assert_eq!(secure_filename("..."), None);
/// ```
pub fn secure_filename(filename: &str) -> Option<String> {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
