use percent_encoding::percent_decode_str;
use url::Url;

/// Fallback file name for image URLs whose path has no usable segment
const FALLBACK_FILE_NAME: &str = "image";

/// Checks whether the last segment of the URL path ends in one of `extensions`
///
/// The comparison is case-insensitive and ignores the query string and
/// fragment, so `https://example.com/a.JPG?w=200` has the extension `jpg`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use img_harvest::url::has_extension;
///
/// let exts = vec!["pdf".to_string(), "zip".to_string()];
/// assert!(has_extension(&Url::parse("https://example.com/doc.PDF").unwrap(), &exts));
/// assert!(!has_extension(&Url::parse("https://example.com/pdf").unwrap(), &exts));
/// ```
pub fn has_extension(url: &Url, extensions: &[String]) -> bool {
    let last = url.path().rsplit('/').next().unwrap_or("");

    match last.rsplit_once('.') {
        Some((_, ext)) => extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Returns the file name an image URL is saved under
///
/// This is the last non-empty path segment, percent-decoded, so
/// `my%20pic.jpg` is saved as `my pic.jpg`. Falls back to `image` when the
/// path has no segment or the decoded name could escape its directory.
pub fn file_name(url: &Url) -> String {
    let Some(segment) = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
    else {
        return FALLBACK_FILE_NAME.to_string();
    };

    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    if decoded.contains(['/', '\\']) || decoded == "." || decoded == ".." {
        return FALLBACK_FILE_NAME.to_string();
    }

    decoded.into_owned()
}
