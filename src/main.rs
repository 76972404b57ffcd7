//! Tuoi Tre harvester main entry point
//!
//! This is the command-line interface for the category harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tuoitre_harvester::config::{parse_config_with_hash, validate, CategoryEntry, Config};
use tuoitre_harvester::crawler::crawl;
use tuoitre_harvester::output::{print_summary, write_summary};
use tuoitre_harvester::url::page_url;
use tracing_subscriber::EnvFilter;

/// Tuoi Tre harvester: articles, media and comments by category
///
/// Walks the paginated listings of the given categories, saves one JSON
/// record per article together with its images and audio, and reports a
/// summary of the run.
#[derive(Parser, Debug)]
#[command(name = "tuoitre-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Harvests tuoitre.vn articles by category", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Category listing URL; repeat for several (replaces the file's list)
    #[arg(long = "category", value_name = "URL")]
    categories: Vec<String>,

    /// Unique articles to collect per category
    #[arg(long, value_name = "N")]
    posts_per_category: Option<usize>,

    /// Directory for the per-article JSON records
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Directory for downloaded audio
    #[arg(long, value_name = "DIR")]
    audio_dir: Option<PathBuf>,

    /// Directory for downloaded images
    #[arg(long, value_name = "DIR")]
    images_dir: Option<PathBuf>,

    /// Base pause before every request, in seconds
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Articles processed concurrently within a category
    #[arg(long, value_name = "N")]
    max_workers: Option<usize>,

    /// Comment count at which a post counts as comment-rich
    #[arg(long, value_name = "N")]
    min_comments_target: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without any requests
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Layers command-line values over the file (or default) configuration
    fn apply_overrides(&self, config: &mut Config) {
        if !self.categories.is_empty() {
            config.categories = self.categories.iter().map(CategoryEntry::new).collect();
        }
        if let Some(posts) = self.posts_per_category {
            config.crawler.posts_per_category = posts;
        }
        if let Some(dir) = &self.output_dir {
            config.output.data_dir = dir.clone();
        }
        if let Some(dir) = &self.audio_dir {
            config.output.audio_dir = dir.clone();
        }
        if let Some(dir) = &self.images_dir {
            config.output.images_dir = dir.clone();
        }
        if let Some(delay) = self.delay {
            config.crawler.delay = delay;
        }
        if let Some(workers) = self.max_workers {
            config.crawler.max_workers = workers;
        }
        if let Some(target) = self.min_comments_target {
            config.crawler.min_comments_target = target;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = parse_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tuoitre_harvester=info,warn"),
            1 => EnvFilter::new("tuoitre_harvester=debug,info"),
            2 => EnvFilter::new("tuoitre_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Tuoi Tre Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Posts per category: {}", config.crawler.posts_per_category);
    println!("  Max workers: {}", config.crawler.max_workers);
    println!(
        "  Delay: {}s (+ up to {}s jitter)",
        config.crawler.delay, config.crawler.jitter
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!(
        "  Retries: {} (backoff {}s)",
        config.crawler.max_retries, config.crawler.retry_backoff
    );
    println!(
        "  Comment-rich threshold: {}",
        config.crawler.min_comments_target
    );

    println!("\nSite:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Comment API: {}", config.site.comment_api);
    println!("  Comment page size: {}", config.site.comment_page_size);

    println!("\nOutput:");
    println!("  Records: {}", config.output.data_dir.display());
    println!("  Audio: {}", config.output.audio_dir.display());
    println!("  Images: {}", config.output.images_dir.display());
    if let Some(path) = &config.output.summary_path {
        println!("  Summary: {}", path.display());
    }

    let targets = config.category_targets();
    println!("\nCategories ({}):", targets.len());
    for target in &targets {
        println!("  - {} ({} posts)", target.url, target.target);
        println!("    * page 2: {}", page_url(&target.url, 2));
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would harvest up to {} posts",
        targets.iter().map(|t| t.target).sum::<usize>()
    );
}

/// Handles the main harvest operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let summary_path = config.output.summary_path.clone();

    tracing::info!(
        "Categories: {}, posts per category: {}",
        config.categories.len(),
        config.crawler.posts_per_category
    );

    let summary = match crawl(config).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("{}", serde_json::to_string(&summary)?);
    print_summary(&summary);

    if let Some(path) = summary_path {
        write_summary(&summary, &path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        println!("\n✓ Summary written to: {}", path.display());
    }

    Ok(())
}
