//! Crawler module for page fetching and image harvesting
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching
//! - HTML parsing and image/link extraction
//! - Image downloads with bounded retries
//! - Depth-first traversal and run coordination

mod coordinator;
mod downloader;
mod engine;
mod fetcher;
mod parser;

pub use coordinator::{read_seed_file, resolve_start_domain, RunCoordinator, SeedSource};
pub use downloader::{DownloadOutcome, ImageDownloader};
pub use engine::CrawlEngine;
pub use fetcher::{build_http_client, Fetcher};
pub use parser::{extract_images, extract_links, parse_page, ParsedPage};

use crate::config::{CrawlPolicy, HttpConfig};
use crate::output::RunSummary;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point for starting a run. It will:
/// 1. Create the base directory
/// 2. Build the HTTP client
/// 3. Crawl every seed in order with one shared run state
/// 4. Return the run summary
///
/// # Example
///
/// ```no_run
/// use img_harvest::config::{CrawlPolicy, HttpConfig};
/// use img_harvest::crawler::harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let policy = CrawlPolicy::new("ImgHarvest", "example.com");
/// let seeds = vec!["https://example.com/".to_string()];
/// let summary = harvest(policy, &HttpConfig::default(), &seeds).await?;
/// println!("{} images", summary.counters.images_downloaded);
/// # Ok(())
/// # }
/// ```
pub async fn harvest(
    policy: CrawlPolicy,
    http: &HttpConfig,
    seeds: &[String],
) -> Result<RunSummary, HarvestError> {
    let mut coordinator = RunCoordinator::new(policy, http)?;
    Ok(coordinator.run(seeds).await)
}
