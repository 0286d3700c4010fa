//! HTML parser for extracting image and link references
//!
//! Parsing is best effort: html5ever recovers from malformed markup, so a page
//! that is not really HTML simply yields fewer (or no) references.

use scraper::{Html, Selector};
use url::Url;

/// References extracted from one page, resolved to absolute URLs
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// `<img src>` targets, in document order, duplicates kept
    pub images: Vec<Url>,

    /// `<a href>` targets, in document order, duplicates kept
    pub links: Vec<Url>,
}

/// Parses markup once and extracts both images and links
///
/// # Example
///
/// ```
/// use img_harvest::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<img src="img/a.png"><a href="/about">About</a>"#;
/// let page = Url::parse("https://example.com/blog/post").unwrap();
/// let parsed = parse_page(html, &page);
/// assert_eq!(parsed.images[0].as_str(), "https://example.com/blog/img/a.png");
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/about");
/// ```
pub fn parse_page(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        images: select_resolved(&document, "img[src]", "src", page_url),
        links: select_resolved(&document, "a[href]", "href", page_url),
    }
}

/// Extracts every image source on the page as an absolute URL
pub fn extract_images(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    select_resolved(&document, "img[src]", "src", page_url)
}

/// Extracts every hyperlink target on the page as an absolute URL
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    select_resolved(&document, "a[href]", "href", page_url)
}

/// Collects `attr` of every element matching `selector`, resolved against `base_url`
fn select_resolved(document: &Html, selector: &str, attr: &str, base_url: &Url) -> Vec<Url> {
    let mut urls = Vec::new();

    if let Ok(selector) = Selector::parse(selector) {
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                if let Some(resolved) = resolve_reference(value, base_url) {
                    urls.push(resolved);
                }
            }
        }
    }

    urls
}

/// Resolves a reference against the page URL
///
/// Returns None for empty references and ones `Url::join` rejects.
fn resolve_reference(reference: &str, base_url: &Url) -> Option<Url> {
    let reference = reference.trim();

    if reference.is_empty() {
        return None;
    }

    match base_url.join(reference) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::trace!("Unresolvable reference '{}' on {}: {}", reference, base_url, e);
            None
        }
    }
}
