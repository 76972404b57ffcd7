//! Run summary aggregation and reporting
//!
//! The summary is owned by the orchestrator for the lifetime of one run and
//! updated exactly once per completed article.

use crate::HarvestError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Counters for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// Listing URL of the category
    pub url: String,

    /// Unique article URLs found on the listing pages
    pub discovered: usize,

    /// Articles that produced a record
    pub processed: usize,
}

/// Aggregate result of one harvesting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Per-category counters in input order
    pub categories: Vec<CategorySummary>,

    pub total_posts: usize,

    /// Comments across all records, nested replies included
    pub total_comments: usize,

    /// Records whose comment count reached the configured threshold
    pub comment_rich_posts: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            categories: Vec::new(),
            total_posts: 0,
            total_comments: 0,
            comment_rich_posts: 0,
        }
    }

    /// Opens a category entry; subsequent records are attributed to it
    pub fn begin_category(&mut self, url: &str, discovered: usize) {
        self.categories.push(CategorySummary {
            url: url.to_string(),
            discovered,
            processed: 0,
        });
    }

    /// Adds one completed article to the totals
    pub fn record_post(&mut self, comment_count: usize, comment_rich_threshold: usize) {
        self.total_posts += 1;
        self.total_comments += comment_count;
        if comment_count >= comment_rich_threshold {
            self.comment_rich_posts += 1;
        }
        if let Some(current) = self.categories.last_mut() {
            current.processed += 1;
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of a finished run, in seconds
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Categories:");
    for category in &summary.categories {
        println!(
            "  {}: {} discovered, {} saved",
            category.url, category.discovered, category.processed
        );
    }
    println!();

    println!("Totals:");
    println!("  Posts saved: {}", summary.total_posts);
    println!("  Comments collected: {}", summary.total_comments);
    println!("  Comment-rich posts: {}", summary.comment_rich_posts);

    if let Some(seconds) = summary.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
}

/// Writes the summary as indented JSON
pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}
