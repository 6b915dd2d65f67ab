//! Helpers for joining endpoint paths onto configurable base URLs.

/// Strip trailing slashes so endpoint paths can be appended safely.
///
/// ```
/// use parley::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com//"),
///     "https://generativelanguage.googleapis.com"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join `endpoint` onto `base_url` with exactly one slash between them.
///
/// ```
/// use parley::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8080/", "/v1beta/models/m:generateContent"),
///     "http://localhost:8080/v1beta/models/m:generateContent"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}
