//! Crawler module for listing discovery and article harvesting
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with throttling and retry logic
//! - Listing page parsing and paginated discovery
//! - The per-article pipeline (extraction, comments, media, record)
//! - Overall run coordination

mod comments;
mod coordinator;
mod fetcher;
mod listing;
mod media;
mod parser;
mod pipeline;

pub use comments::{CommentFetcher, CommentThread};
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, Fetcher, Query, RequestPolicy, USER_AGENTS};
pub use listing::ListingDiscoverer;
pub use media::{audio_file_name, MediaDownloader, DEFAULT_AUDIO_EXT};
pub use parser::{extract_listing_anchors, ListingAnchor, LISTING_SELECTORS};
pub use pipeline::{ArticlePipeline, ProcessedPost};

use crate::config::Config;
use crate::output::RunSummary;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point for starting a run. It will:
/// 1. Create the output directories and the HTTP client
/// 2. Walk each category's listing pages for article URLs
/// 3. Process the articles of each category concurrently
/// 4. Return the aggregated run summary
///
/// # Arguments
///
/// * `config` - The validated harvester configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Run completed
/// * `Err(HarvestError)` - Setup failed or no categories were given
pub async fn crawl(config: Config) -> Result<RunSummary, HarvestError> {
    run_crawl(config).await
}
