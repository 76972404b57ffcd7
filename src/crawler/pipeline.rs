//! Per-article processing
//!
//! Turns one article URL into one persisted [`ArticleRecord`]. The post id is
//! claimed in the run's visited set right after it is extracted, so duplicate
//! URLs never reach the comment or media stages.

use crate::config::Config;
use crate::crawler::comments::CommentFetcher;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::media::MediaDownloader;
use crate::extract::{ArticleDocument, ArticleMetadata};
use crate::output::{write_record, ArticleRecord, Reactions};
use crate::state::RunState;
use crate::HarvestError;
use std::path::PathBuf;
use url::Url;

/// What the orchestrator needs to know about a saved article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedPost {
    pub post_id: String,
    pub url: String,
    pub data_path: PathBuf,
    pub category: String,
    pub comment_count: usize,
}

/// Fields pulled out of the article page before any further network work
struct ExtractedArticle {
    post_id: String,
    metadata: ArticleMetadata,
    text: String,
    images: Vec<String>,
    audio: Vec<String>,
    reactions: Reactions,
}

/// Processes article URLs against shared run state
pub struct ArticlePipeline<'a> {
    fetcher: &'a Fetcher,
    config: &'a Config,
    base: &'a Url,
    state: &'a RunState,
}

impl<'a> ArticlePipeline<'a> {
    pub fn new(fetcher: &'a Fetcher, config: &'a Config, base: &'a Url, state: &'a RunState) -> Self {
        Self {
            fetcher,
            config,
            base,
            state,
        }
    }

    /// Fetches, extracts, enriches and saves one article
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ProcessedPost))` - The record was written
    /// * `Ok(None)` - The page could not be fetched, has no post id, or its
    ///   post id was already handled in this run
    /// * `Err(HarvestError)` - The record could not be written; the post id is
    ///   released so another URL for it may still succeed
    pub async fn process(
        &self,
        url: &str,
        fallback_category: &str,
    ) -> Result<Option<ProcessedPost>, HarvestError> {
        let Some(html) = self.fetcher.fetch_html(url).await else {
            return Ok(None);
        };

        let Some(article) = self.extract(&html, url) else {
            return Ok(None);
        };

        let post_id = article.post_id;
        let thread = CommentFetcher::new(self.fetcher, &self.config.site)
            .fetch_comments(&post_id)
            .await;

        let media = MediaDownloader::new(
            self.fetcher,
            &self.config.output.images_dir,
            &self.config.output.audio_dir,
        );
        let image_files = media.download_images(&post_id, &article.images).await;
        let audio_files = media.download_audio(&post_id, &article.audio).await;

        let category = article
            .metadata
            .category
            .unwrap_or_else(|| fallback_category.to_string());

        let record = ArticleRecord {
            post_id: post_id.clone(),
            title: article.metadata.title.unwrap_or_default(),
            content: article.text,
            authors: article.metadata.authors,
            date: article.metadata.date,
            category: category.clone(),
            source_url: url.to_string(),
            audio_files,
            image_files,
            vote_reactions: article.reactions,
            comments: thread.comments,
        };

        let data_path = match write_record(&self.config.output.data_dir, &record).await {
            Ok(path) => path,
            Err(e) => {
                self.state.visited.release(&post_id);
                return Err(e);
            }
        };

        Ok(Some(ProcessedPost {
            post_id,
            url: url.to_string(),
            data_path,
            category,
            comment_count: record.comment_count(),
        }))
    }

    /// Parses the page and claims its post id
    ///
    /// Kept synchronous: the parsed document must not be held across an await.
    fn extract(&self, html: &str, url: &str) -> Option<ExtractedArticle> {
        let document = ArticleDocument::parse(html, url);

        let Some(post_id) = document.post_id() else {
            tracing::warn!("No post id found for {}", url);
            return None;
        };

        if !self.state.visited.claim(&post_id) {
            tracing::debug!("Skipping duplicate post {} at {}", post_id, url);
            return None;
        }

        let metadata = document.metadata();
        let content = document.content(self.base);
        let audio = self.state.listing_audio.merge_for(url, &content.audio);

        Some(ExtractedArticle {
            post_id,
            metadata,
            text: content.text,
            images: content.images,
            audio,
            reactions: document.reactions(),
        })
    }
}
