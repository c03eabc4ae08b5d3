//! URL string helpers.
//!
//! These work on plain strings so that crates without a URL parser can use
//! them. Connectors that need full resolution use the `url` crate.

/// Remove the `#fragment` part of a URL.
///
/// # Examples
///
/// ```
/// use deepbrain_core::util::urls::strip_fragment;
///
/// assert_eq!(strip_fragment("https://a.fr/p#top"), "https://a.fr/p");
/// assert_eq!(strip_fragment("https://a.fr/p"), "https://a.fr/p");
/// ```
pub fn strip_fragment(url: &str) -> &str {
    match url.find('#') {
        Some(pos) => &url[..pos],
        None => url,
    }
}

/// Last non-empty path segment of a URL, ignoring query and fragment.
///
/// Returns `None` for URLs without a path (e.g. `https://example.org/`).
///
/// # Examples
///
/// ```
/// use deepbrain_core::util::urls::file_name_from_url;
///
/// assert_eq!(
///     file_name_from_url("https://www.georisques.gouv.fr/docs/ppri.pdf?v=2"),
///     Some("ppri.pdf".to_string())
/// );
/// assert_eq!(file_name_from_url("https://www.georisques.gouv.fr/"), None);
/// ```
pub fn file_name_from_url(url: &str) -> Option<String> {
    let without_fragment = strip_fragment(url);
    let without_query = match without_fragment.find('?') {
        Some(pos) => &without_fragment[..pos],
        None => without_fragment,
    };
    let path = match without_query.find("://") {
        Some(pos) => {
            let after_scheme = &without_query[pos + 3..];
            match after_scheme.find('/') {
                Some(slash) => &after_scheme[slash..],
                None => "",
            }
        }
        None => without_query,
    };

    path.split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Whether the URL path ends with `.pdf` (case-insensitive).
pub fn is_pdf_url(url: &str) -> bool {
    file_name_from_url(url)
        .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
}
