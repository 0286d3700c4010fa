use serde::Deserialize;
use std::path::PathBuf;

/// Default number of download attempts per image
pub const DEFAULT_MAX_IMAGE_ATTEMPTS: u32 = 3;

/// Default base directory for downloaded images, relative to the working directory
pub const DEFAULT_BASE_DIR: &str = "ImgHarvest";

/// Main configuration structure for ImgHarvest
///
/// Every section and key is optional; missing values fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of fetch-and-write attempts per image before it is given up on
    #[serde(rename = "max-image-attempts")]
    pub max_image_attempts: u32,

    /// URL path extensions that are never fetched as pages
    #[serde(rename = "blocked-extensions")]
    pub blocked_extensions: Vec<String>,

    /// URL path extensions that mark a crawl target as a direct image
    #[serde(rename = "image-extensions")]
    pub image_extensions: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_image_attempts: DEFAULT_MAX_IMAGE_ATTEMPTS,
            blocked_extensions: ["mp4", "avi", "mov", "pdf", "zip", "exe"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            image_extensions: ["jpg", "png", "gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("ImgHarvest/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory images are saved under
    #[serde(rename = "base-dir")]
    pub base_dir: Option<PathBuf>,
}

/// Resolved crawl policy, fixed for the whole run
#[derive(Debug, Clone)]
pub struct CrawlPolicy {
    /// Root of the downloaded image tree
    pub base_dir: PathBuf,

    /// Host of the first seed URL; anchors the same-domain policy
    pub start_domain: String,

    /// Follow links whose host differs from `start_domain`
    pub crawl_external: bool,

    /// Skip image URLs already dispatched earlier in this run
    pub deduplicate: bool,

    pub blocked_extensions: Vec<String>,
    pub image_extensions: Vec<String>,
    pub max_image_attempts: u32,
}

impl CrawlPolicy {
    /// Builds a policy using the crawler defaults for everything but the
    /// operator-facing choices
    pub fn new(base_dir: impl Into<PathBuf>, start_domain: impl Into<String>) -> Self {
        Self::from_config(&CrawlerConfig::default(), base_dir, start_domain)
    }

    /// Builds a policy from the crawler section of a loaded configuration
    pub fn from_config(
        config: &CrawlerConfig,
        base_dir: impl Into<PathBuf>,
        start_domain: impl Into<String>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            start_domain: start_domain.into(),
            crawl_external: false,
            deduplicate: true,
            blocked_extensions: config.blocked_extensions.clone(),
            image_extensions: config.image_extensions.clone(),
            max_image_attempts: config.max_image_attempts,
        }
    }

    pub fn with_crawl_external(mut self, crawl_external: bool) -> Self {
        self.crawl_external = crawl_external;
        self
    }

    pub fn with_deduplication(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }
}
