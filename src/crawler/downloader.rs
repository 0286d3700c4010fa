//! Image downloader with bounded retries
//!
//! Images are saved under the directory of the page they were found on (see
//! [`page_directory`]). Each image gets up to `max_attempts` fetch-and-write
//! attempts, retried back to back. Once the budget is spent the URL is
//! recorded as failed and never attempted again in the same run.

use crate::crawler::fetcher::Fetcher;
use crate::state::RunState;
use crate::url::{file_name, page_directory};
use crate::HarvestError;
use reqwest::Response;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use url::Url;

/// What happened to one download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The image was fetched and written to this path
    Saved(PathBuf),

    /// A file already exists at the destination; nothing was fetched
    AlreadyExists(PathBuf),

    /// The URL exhausted its attempts earlier in this run
    PreviouslyFailed,

    /// Every attempt failed; the URL is now recorded as failed
    Failed { attempts: u32 },
}

/// Result of a single attempt that did not error
enum AttemptResult {
    Saved,
    Exists,
}

/// Downloads images into the harvest directory tree
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    fetcher: Fetcher,
    base_dir: PathBuf,
    max_attempts: u32,
}

impl ImageDownloader {
    pub fn new(fetcher: Fetcher, base_dir: impl Into<PathBuf>, max_attempts: u32) -> Self {
        Self {
            fetcher,
            base_dir: base_dir.into(),
            max_attempts,
        }
    }

    /// Computes where an image found on `page_url` is saved
    pub fn destination(&self, image_url: &Url, page_url: &Url) -> PathBuf {
        page_directory(&self.base_dir, page_url).join(file_name(image_url))
    }

    /// Downloads `image_url`, found on `page_url`, with bounded retries
    ///
    /// Fetch and filesystem errors share the same attempt budget. Counters and
    /// the failed-image set in `state` are updated here.
    pub async fn download(
        &self,
        state: &mut RunState,
        image_url: &Url,
        page_url: &Url,
    ) -> DownloadOutcome {
        if state.is_image_failed(image_url.as_str()) {
            tracing::info!(
                "Skipping {}: already failed {} times",
                image_url,
                self.max_attempts
            );
            return DownloadOutcome::PreviouslyFailed;
        }

        let destination = self.destination(image_url, page_url);
        let mut attempts = 0;

        while attempts < self.max_attempts {
            match self.attempt(image_url, &destination).await {
                Ok(AttemptResult::Saved) => {
                    state.counters.record_download();
                    tracing::info!(
                        "Saved {} to {}",
                        image_url,
                        destination.display()
                    );
                    return DownloadOutcome::Saved(destination);
                }
                Ok(AttemptResult::Exists) => {
                    tracing::info!(
                        "Skipping {}: file already exists",
                        destination.display()
                    );
                    return DownloadOutcome::AlreadyExists(destination);
                }
                Err(e) => {
                    attempts += 1;
                    tracing::warn!(
                        "Failed to download {} (attempt {}/{}): {}",
                        image_url,
                        attempts,
                        self.max_attempts,
                        e
                    );
                }
            }
        }

        tracing::error!(
            "Giving up on {} after {} failed attempts",
            image_url,
            attempts
        );
        state.mark_image_failed(image_url.as_str());
        DownloadOutcome::Failed { attempts }
    }

    /// One fetch-and-write attempt
    async fn attempt(
        &self,
        image_url: &Url,
        destination: &Path,
    ) -> Result<AttemptResult, HarvestError> {
        if let Some(dir) = destination.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| HarvestError::io(dir, e))?;
        }

        if fs::try_exists(destination).await.unwrap_or(false) {
            return Ok(AttemptResult::Exists);
        }

        tracing::info!("Downloading {}", image_url);
        let response = self.fetcher.get(image_url).await?;

        let partial = partial_path(destination);
        if let Err(e) = write_body(response, image_url, &partial, destination).await {
            // Best effort; the next attempt recreates it anyway
            let _ = fs::remove_file(&partial).await;
            return Err(e);
        }

        Ok(AttemptResult::Saved)
    }
}

/// Streams the response body into `partial`, then moves it to `destination`
///
/// The destination path only ever holds a complete file, so the on-disk
/// existence check never mistakes a torn write for a finished download.
async fn write_body(
    mut response: Response,
    image_url: &Url,
    partial: &Path,
    destination: &Path,
) -> Result<(), HarvestError> {
    let mut file = fs::File::create(partial)
        .await
        .map_err(|e| HarvestError::io(partial, e))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|source| HarvestError::Http {
            url: image_url.to_string(),
            source,
        })?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| HarvestError::io(partial, e))?;
    }

    file.flush()
        .await
        .map_err(|e| HarvestError::io(partial, e))?;
    drop(file);

    fs::rename(partial, destination)
        .await
        .map_err(|e| HarvestError::io(destination, e))
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}
