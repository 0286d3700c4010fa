//! Configuration module for ImgHarvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and holds the resolved [`CrawlPolicy`].
//!
//! # Example
//!
//! ```no_run
//! use img_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Image attempts: {}", config.crawler.max_image_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlPolicy, CrawlerConfig, HttpConfig, OutputConfig, DEFAULT_BASE_DIR,
    DEFAULT_MAX_IMAGE_ATTEMPTS,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
