use serde::Deserialize;
use std::path::PathBuf;

/// Public key the comment widget sends with every listing request
pub const DEFAULT_COMMENT_APP_KEY: &str =
    "lHLShlUMAshjvNkHmBzNqERFZammKUXB1DjEuXKfWAwkunzW6fFbfrhP/IG0Xwp7aPwhwIuucLW1TVC9lzmUoA==";

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    pub output: OutputConfig,
    #[serde(rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

impl Config {
    /// Resolves every configured category into a listing URL plus target count
    pub fn category_targets(&self) -> Vec<CategoryTarget> {
        self.categories
            .iter()
            .map(|entry| CategoryTarget {
                url: entry.url.clone(),
                target: entry.posts.unwrap_or(self.crawler.posts_per_category),
            })
            .collect()
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of unique articles to collect from each category
    pub posts_per_category: usize,

    /// Maximum number of articles processed concurrently
    pub max_workers: usize,

    /// Base delay applied before every request (seconds)
    pub delay: f64,

    /// Upper bound of the random delay added on top of `delay` (seconds)
    pub jitter: f64,

    /// Per-request timeout (seconds)
    pub request_timeout: u64,

    /// Retries on transient statuses and timeouts
    pub max_retries: u32,

    /// Exponential backoff factor between retries (seconds)
    pub retry_backoff: f64,

    /// Comment count at which an article counts as comment-rich
    pub min_comments_target: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            posts_per_category: 40,
            max_workers: 4,
            delay: 0.6,
            jitter: 0.3,
            request_timeout: 30,
            max_retries: 5,
            retry_backoff: 0.6,
            min_comments_target: 20,
        }
    }
}

/// Site endpoints and request identity
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Origin used to absolutize relative links
    pub base_url: String,

    /// Comment listing endpoint
    pub comment_api: String,

    /// Application key sent to the comment endpoint
    pub comment_app_key: String,

    /// Comments requested per page
    pub comment_page_size: usize,

    /// Value of the Accept-Language header
    pub accept_language: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tuoitre.vn".to_string(),
            comment_api: "https://id.tuoitre.vn/api/getlist-comment.api".to_string(),
            comment_app_key: DEFAULT_COMMENT_APP_KEY.to_string(),
            comment_page_size: 50,
            accept_language: "vi-VN,vi;q=0.9,en-US;q=0.7,en;q=0.5".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving one `<postId>.json` per article
    pub data_dir: PathBuf,

    /// Directory receiving downloaded audio
    pub audio_dir: PathBuf,

    /// Root directory for per-article image folders
    pub images_dir: PathBuf,

    /// Optional path of the JSON run summary
    pub summary_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            audio_dir: PathBuf::from("audio"),
            images_dir: PathBuf::from("images"),
            summary_path: None,
        }
    }
}

/// A category listing to harvest
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    /// Listing URL of the category (page 1)
    pub url: String,

    /// Overrides `crawler.posts-per-category` for this category
    #[serde(default)]
    pub posts: Option<usize>,
}

impl CategoryEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            posts: None,
        }
    }
}

/// A listing URL paired with the number of unique articles wanted from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTarget {
    pub url: String,
    pub target: usize,
}
