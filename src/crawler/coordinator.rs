//! Run coordinator - drives one harvest from seeds to summary
//!
//! This module contains:
//! - Seed loading (a single URL or a line-delimited seed file)
//! - Start-domain resolution
//! - Base directory preparation
//! - The timed, sequential crawl over all seeds

use crate::config::{CrawlPolicy, HttpConfig};
use crate::crawler::engine::CrawlEngine;
use crate::crawler::fetcher::Fetcher;
use crate::output::RunSummary;
use crate::state::RunState;
use crate::url::extract_domain;
use crate::{ConfigError, HarvestError};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::Instant;
use url::Url;

/// Where the seed URLs of a run come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    /// One URL given directly
    Url(String),

    /// A file with one URL per line
    File(PathBuf),
}

impl SeedSource {
    /// Loads the seed list
    ///
    /// File lines are returned as-is, in file order; lines that are not URLs
    /// are rejected later, one by one, when they are crawled.
    pub fn load(&self) -> Result<Vec<String>, ConfigError> {
        match self {
            SeedSource::Url(url) => Ok(vec![url.clone()]),
            SeedSource::File(path) => read_seed_file(path),
        }
    }
}

/// Reads a newline-delimited seed file
pub fn read_seed_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedFile {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content.lines().map(str::to_string).collect())
}

/// Resolves the start domain that anchors the same-domain policy
///
/// Uses `preferred` when given, otherwise the first seed that parses as a URL
/// with a host.
pub fn resolve_start_domain(
    preferred: Option<&str>,
    seeds: &[String],
) -> Result<String, ConfigError> {
    if let Some(url) = preferred {
        let parsed = Url::parse(url.trim())
            .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", url, e)))?;
        return extract_domain(&parsed)
            .ok_or_else(|| ConfigError::InvalidUrl(format!("'{}' has no host", url)));
    }

    seeds
        .iter()
        .filter_map(|seed| Url::parse(seed.trim()).ok())
        .find_map(|url| extract_domain(&url))
        .ok_or_else(|| ConfigError::Validation("no seed URL with a host was given".to_string()))
}

/// Coordinates one run over all seeds with a shared run state
pub struct RunCoordinator {
    engine: CrawlEngine,
}

impl RunCoordinator {
    /// Creates the base directory and the HTTP client for a run
    ///
    /// # Returns
    ///
    /// * `Ok(RunCoordinator)` - Ready to run
    /// * `Err(HarvestError)` - Base directory or client could not be set up
    pub fn new(policy: CrawlPolicy, http: &HttpConfig) -> Result<Self, HarvestError> {
        std::fs::create_dir_all(&policy.base_dir).map_err(|source| ConfigError::BaseDir {
            path: policy.base_dir.clone(),
            source,
        })?;

        let fetcher = Fetcher::from_config(http)?;
        Ok(Self::with_engine(CrawlEngine::new(policy, fetcher)))
    }

    pub fn with_engine(engine: CrawlEngine) -> Self {
        Self { engine }
    }

    pub fn state(&self) -> &RunState {
        self.engine.state()
    }

    /// Crawls every seed in order and returns the run summary
    ///
    /// The visited set carries over between seeds, so later seeds skip pages
    /// an earlier seed already reached.
    pub async fn run(&mut self, seeds: &[String]) -> RunSummary {
        let policy = self.engine.policy();
        tracing::info!(
            "Starting harvest of {} seed(s) into {} (start domain: {}, external: {}, dedup: {})",
            seeds.len(),
            policy.base_dir.display(),
            policy.start_domain,
            policy.crawl_external,
            policy.deduplicate
        );

        let started_at = Local::now();
        let timer = Instant::now();

        for seed in seeds {
            self.engine.crawl(seed).await;
        }

        let summary = RunSummary {
            counters: self.engine.state().counters,
            elapsed: timer.elapsed(),
            started_at,
            finished_at: Local::now(),
        };

        tracing::info!(
            "Harvest completed: {} URLs crawled in {:.2}s",
            summary.counters.urls_crawled,
            summary.elapsed.as_secs_f64()
        );

        summary
    }
}
