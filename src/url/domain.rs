use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// URLs without a host (`mailto:`, `data:` and friends) return None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use img_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if the URL's host is not the start domain
///
/// Ports are not part of the comparison. A URL without a host is always
/// considered external.
pub fn is_external(url: &Url, start_domain: &str) -> bool {
    match extract_domain(url) {
        Some(domain) => !domain.eq_ignore_ascii_case(start_domain),
        None => true,
    }
}
