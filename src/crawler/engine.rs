//! Crawl engine - depth-first page traversal
//!
//! The engine owns the run state and walks the link graph one page at a time.
//! Instead of recursing per link it keeps an explicit stack of page frames:
//! the frame on top is the page currently being worked on, and each of its
//! links is evaluated only after the previous link's whole subtree is done.
//! That gives the same order as the recursive walk without growing the call
//! stack on large sites.

use crate::config::CrawlPolicy;
use crate::crawler::downloader::ImageDownloader;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::parse_page;
use crate::state::RunState;
use crate::url::{has_extension, is_external, is_fetchable};
use std::vec::IntoIter;
use url::Url;

/// A fetched page whose links are still being followed
#[derive(Debug)]
struct PageFrame {
    url: Url,
    links: IntoIter<Url>,
}

/// Sequential, depth-first crawler
pub struct CrawlEngine {
    policy: CrawlPolicy,
    fetcher: Fetcher,
    downloader: ImageDownloader,
    state: RunState,
}

impl CrawlEngine {
    /// Creates an engine with fresh run state
    pub fn new(policy: CrawlPolicy, fetcher: Fetcher) -> Self {
        let downloader = ImageDownloader::new(
            fetcher.clone(),
            policy.base_dir.clone(),
            policy.max_image_attempts,
        );

        Self {
            policy,
            fetcher,
            downloader,
            state: RunState::new(),
        }
    }

    pub fn policy(&self) -> &CrawlPolicy {
        &self.policy
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Crawls `url` and everything reachable from it under the domain policy
    ///
    /// Calling this again with a URL visited earlier in the run is a no-op.
    /// Failures are logged and never abort the crawl.
    pub async fn crawl(&mut self, url: &str) {
        let seed = match Url::parse(url) {
            Ok(seed) => seed,
            Err(e) => {
                tracing::error!("Invalid seed URL '{}': {}", url, e);
                return;
            }
        };

        let mut stack = Vec::new();
        if let Some(frame) = self.visit(seed).await {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(link) = frame.links.next() else {
                if let Some(done) = stack.pop() {
                    self.finish_page(&done.url).await;
                }
                continue;
            };

            if !self.should_follow(&link) {
                continue;
            }

            if let Some(child) = self.visit(link).await {
                stack.push(child);
            }
        }
    }

    /// Applies the domain policy to a discovered link
    fn should_follow(&self, link: &Url) -> bool {
        if !is_fetchable(link) {
            tracing::debug!("Skipping link with unsupported scheme: {}", link);
            return false;
        }

        if is_external(link, &self.policy.start_domain) && !self.policy.crawl_external {
            tracing::info!(
                "Skipping external link {} (crawling external URLs is disabled)",
                link
            );
            return false;
        }

        !self.state.is_visited(link.as_str())
    }

    /// Fetches one page and dispatches its images
    ///
    /// Returns a frame holding the page's links when the page was fetched, or
    /// None when it was skipped or the fetch failed.
    async fn visit(&mut self, url: Url) -> Option<PageFrame> {
        if self.state.is_visited(url.as_str()) {
            tracing::info!("Skipping already visited URL: {}", url);
            return None;
        }

        // Not recorded as visited, so a re-link logs the skip again
        if has_extension(&url, &self.policy.blocked_extensions) {
            tracing::info!("Skipping non-HTML content: {}", url);
            return None;
        }

        tracing::info!("Crawling: {}", url);
        self.state.mark_visited(url.as_str());
        self.state.counters.record_crawl();

        let body = match self.fetcher.fetch_text(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to crawl {}: {}", url, e);
                return None;
            }
        };

        let parsed = parse_page(&body, &url);
        tracing::debug!(
            "{}: {} images, {} links",
            url,
            parsed.images.len(),
            parsed.links.len()
        );

        for image in &parsed.images {
            self.dispatch_image(image, &url).await;
        }

        Some(PageFrame {
            url,
            links: parsed.links.into_iter(),
        })
    }

    /// Sends one discovered image to the downloader, honoring deduplication
    async fn dispatch_image(&mut self, image: &Url, page: &Url) {
        if !is_fetchable(image) {
            tracing::debug!("Skipping image with unsupported scheme: {}", image);
            return;
        }

        if self.policy.deduplicate && self.state.is_image_downloaded(image.as_str()) {
            tracing::info!("Skipping duplicate image: {}", image);
            return;
        }

        self.downloader.download(&mut self.state, image, page).await;

        if self.policy.deduplicate {
            self.state.mark_image_downloaded(image.as_str());
        }
    }

    /// Runs once every link of a page has been followed
    async fn finish_page(&mut self, url: &Url) {
        if has_extension(url, &self.policy.image_extensions) {
            tracing::info!("Found direct image URL: {}", url);
            let outcome = self.downloader.download(&mut self.state, url, url).await;
            tracing::debug!("Direct image {}: {:?}", url, outcome);
        }
    }
}
