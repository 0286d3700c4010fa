//! ImgHarvest: a recursive website image harvester
//!
//! This crate crawls a website from one or more seed URLs, follows links
//! depth-first and downloads every image it finds into a directory tree that
//! mirrors the pages the images were found on.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ImgHarvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl HarvestError {
    /// Wraps an IO error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to read seed file {}: {source}", path.display())]
    SeedFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create base directory {}: {source}", path.display())]
    BaseDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for ImgHarvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlPolicy};
pub use crawler::{CrawlEngine, RunCoordinator};
pub use output::RunSummary;
pub use state::{RunCounters, RunState};
