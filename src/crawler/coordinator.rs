//! Crawler coordinator - main harvest orchestration logic
//!
//! This module contains the run loop that coordinates a harvest:
//! - Preparing output directories and the shared HTTP transport
//! - Walking categories one after another
//! - Fanning each category's articles out to a bounded set of workers
//! - Aggregating completed articles into the run summary

use crate::config::{CategoryTarget, Config};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::listing::ListingDiscoverer;
use crate::crawler::pipeline::ArticlePipeline;
use crate::output::RunSummary;
use crate::state::RunState;
use crate::url::category_slug;
use crate::HarvestError;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use url::Url;

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Fetcher,
    base_url: Url,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Output directories are created here, before anything is written.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - Bad base URL, unwritable output roots, or the
    ///   HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let base_url = Url::parse(&config.site.base_url)?;

        for dir in [
            &config.output.data_dir,
            &config.output.audio_dir,
            &config.output.images_dir,
        ] {
            std::fs::create_dir_all(dir)?;
        }

        let fetcher = Fetcher::new(&config.crawler, &config.site)?;

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            base_url,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Harvests every configured category
    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        let targets = self.config.category_targets();
        self.run_categories(&targets).await
    }

    /// Harvests the given categories, sequentially and in order
    ///
    /// Fails only when `targets` is empty. A category whose listing cannot be
    /// read, or an article that fails, is logged and skipped.
    pub async fn run_categories(
        &self,
        targets: &[CategoryTarget],
    ) -> Result<RunSummary, HarvestError> {
        if targets.is_empty() {
            return Err(HarvestError::NoCategories);
        }

        let state = RunState::new();
        let mut summary = RunSummary::new();
        let start_time = std::time::Instant::now();

        tracing::info!(
            "Starting harvest of {} categories with {} workers",
            targets.len(),
            self.config.crawler.max_workers
        );

        for target in targets {
            self.process_category(target, &state, &mut summary).await;
        }

        summary.finish();
        if !state.listing_audio.is_empty() {
            tracing::debug!(
                "Listing pages advertised audio for {} articles",
                state.listing_audio.len()
            );
        }
        if state.visited.is_empty() {
            tracing::warn!("No article yielded a post id");
        } else {
            tracing::debug!("{} distinct post ids seen", state.visited.len());
        }
        tracing::info!(
            "Harvest completed: {} posts, {} comments in {:?}",
            summary.total_posts,
            summary.total_comments,
            start_time.elapsed()
        );

        Ok(summary)
    }

    /// Discovers one category's articles and processes them concurrently
    ///
    /// Results are folded into `summary` here, one at a time, as workers
    /// finish.
    async fn process_category(
        &self,
        target: &CategoryTarget,
        state: &RunState,
        summary: &mut RunSummary,
    ) {
        tracing::info!("Crawling category {} (target {})", target.url, target.target);

        let urls = ListingDiscoverer::new(&self.fetcher, &self.base_url, &state.listing_audio)
            .discover(&target.url, target.target)
            .await;
        tracing::info!("Discovered {} posts in {}", urls.len(), target.url);
        summary.begin_category(&target.url, urls.len());

        let slug = category_slug(&target.url);
        let slug = slug.as_str();
        let pipeline = ArticlePipeline::new(&self.fetcher, &self.config, &self.base_url, state);
        let pipeline = &pipeline;
        let workers = self.config.crawler.max_workers.max(1);
        let threshold = self.config.crawler.min_comments_target;

        let mut results = stream::iter(urls)
            .map(move |url| async move {
                let outcome = pipeline.process(&url, slug).await;
                (url, outcome)
            })
            .buffer_unordered(workers);

        while let Some((url, outcome)) = results.next().await {
            match outcome {
                Ok(Some(post)) => {
                    tracing::info!(
                        "Saved {} [{}] ({} comments) from {} to {}",
                        post.post_id,
                        post.category,
                        post.comment_count,
                        post.url,
                        post.data_path.display()
                    );
                    summary.record_post(post.comment_count, threshold);
                }
                Ok(None) => {}
                Err(e) => tracing::error!("Failed to process {}: {}", url, e),
            }
        }

        if let Some(category) = summary.categories.last() {
            tracing::info!(
                "Finished {}: {}/{} posts saved",
                category.url,
                category.processed,
                category.discovered
            );
        }
    }
}

/// Runs a complete harvest
///
/// # Example
///
/// ```no_run
/// use tuoitre_harvester::config::load_config;
/// use tuoitre_harvester::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_crawl(config).await?;
/// println!("{} posts", summary.total_posts);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<RunSummary, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
