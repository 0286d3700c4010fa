//! URL handling module for ImgHarvest
//!
//! This module provides domain extraction, the same-domain policy check,
//! file-extension heuristics and the page-to-directory mapping used for
//! image destinations.

mod domain;
mod extension;

use std::path::{Path, PathBuf};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, is_external};
pub use extension::{file_name, has_extension};

/// Returns true if the URL uses a scheme the fetcher can retrieve
pub fn is_fetchable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Maps a page URL onto its directory under `base_dir`
///
/// The page host becomes the first directory and each non-empty path segment
/// becomes a nested directory, so `https://example.com/blog/post` maps to
/// `<base_dir>/example.com/blog/post`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use url::Url;
/// use img_harvest::url::page_directory;
///
/// let page = Url::parse("https://example.com/blog/post").unwrap();
/// let dir = page_directory(Path::new("out"), &page);
/// assert_eq!(dir, Path::new("out").join("example.com").join("blog").join("post"));
/// ```
pub fn page_directory(base_dir: &Path, page_url: &Url) -> PathBuf {
    let mut dir = base_dir.to_path_buf();

    if let Some(host) = page_url.host_str() {
        dir.push(host);
    }

    if let Some(segments) = page_url.path_segments() {
        for segment in segments.filter(|s| !s.is_empty() && *s != "." && *s != "..") {
            dir.push(segment);
        }
    }

    dir
}
