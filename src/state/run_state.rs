//! Run state for a single harvest
//!
//! All mutable bookkeeping of a run lives here instead of in process-wide
//! statics, so independent runs (and tests) never share state.

use crate::state::RunCounters;
use std::collections::HashSet;

/// Mutable state owned by one run of the crawl engine
#[derive(Debug, Default)]
pub struct RunState {
    /// URLs submitted to the engine; added before the fetch begins
    visited: HashSet<String>,

    /// Image URLs already dispatched to the downloader (dedup mode only)
    downloaded_images: HashSet<String>,

    /// Image URLs that exhausted their download attempts
    failed_images: HashSet<String>,

    pub counters: RunCounters,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Marks a URL as visited
    ///
    /// Returns false if it had already been visited.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_image_downloaded(&self, image_url: &str) -> bool {
        self.downloaded_images.contains(image_url)
    }

    pub fn mark_image_downloaded(&mut self, image_url: &str) {
        self.downloaded_images.insert(image_url.to_string());
    }

    pub fn is_image_failed(&self, image_url: &str) -> bool {
        self.failed_images.contains(image_url)
    }

    /// Records an image as permanently failed and counts it
    ///
    /// Counting happens only the first time a URL is recorded.
    pub fn mark_image_failed(&mut self, image_url: &str) {
        if self.failed_images.insert(image_url.to_string()) {
            self.counters.record_failure();
        }
    }
}
