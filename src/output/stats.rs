//! Run summary generation
//!
//! This module turns the counters collected during a run into the summary
//! shown to the operator once the crawl is finished.

use crate::state::RunCounters;
use chrono::{DateTime, Local};
use std::time::Duration;

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Final counter values
    pub counters: RunCounters,

    /// Wall-clock time from the first crawl call to the last
    pub elapsed: Duration,

    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl RunSummary {
    /// True if at least one image exhausted its download attempts
    pub fn has_failures(&self) -> bool {
        self.counters.images_failed > 0
    }
}

/// Renders the summary as the lines shown at the end of a run
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    vec![
        format!("Total URLs crawled: {}", summary.counters.urls_crawled),
        format!(
            "Total images downloaded: {}",
            summary.counters.images_downloaded
        ),
        format!("Total failed downloads: {}", summary.counters.images_failed),
        format!(
            "Total time taken: {:.2} seconds",
            summary.elapsed.as_secs_f64()
        ),
    ]
}

/// Prints the summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("=== Harvest Summary ===\n");
    println!(
        "  Started:  {}",
        summary.started_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Finished: {}",
        summary.finished_at.format("%Y-%m-%d %H:%M:%S")
    );
    for line in format_summary(summary) {
        println!("  {}", line);
    }

    if summary.has_failures() {
        println!(
            "\n{} image(s) could not be downloaded; see the log for details",
            summary.counters.images_failed
        );
    }
}
