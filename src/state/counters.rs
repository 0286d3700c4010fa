/// Totals collected during a run
///
/// Counters only ever go up; they are read once when the summary is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Pages submitted for fetching (block-listed and duplicate URLs excluded)
    pub urls_crawled: u64,

    /// Images written to disk
    pub images_downloaded: u64,

    /// Images that exhausted their download attempts
    pub images_failed: u64,
}

impl RunCounters {
    pub fn record_crawl(&mut self) {
        self.urls_crawled += 1;
    }

    pub fn record_download(&mut self) {
        self.images_downloaded += 1;
    }

    pub fn record_failure(&mut self) {
        self.images_failed += 1;
    }
}
