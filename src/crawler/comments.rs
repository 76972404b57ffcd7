//! Paginated comment retrieval
//!
//! The comment service is queried page by page with a fixed page size until it
//! runs out of data. Any failure ends the walk early; what was collected so far
//! is kept.

use crate::config::SiteConfig;
use crate::crawler::fetcher::Fetcher;
use crate::extract::{decode_comment_page, normalize_comment};
use crate::output::{count_comments, CommentNode};
use serde_json::Value;

/// Comments of one article, with the total number of nodes in the forest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentThread {
    pub comments: Vec<CommentNode>,
    pub total: usize,
}

/// Fetches comment forests from the site's comment API
pub struct CommentFetcher<'a> {
    fetcher: &'a Fetcher,
    site: &'a SiteConfig,
}

impl<'a> CommentFetcher<'a> {
    pub fn new(fetcher: &'a Fetcher, site: &'a SiteConfig) -> Self {
        Self { fetcher, site }
    }

    /// Retrieves every comment page for `post_id`
    ///
    /// Pages are requested from index 1. The walk ends on:
    /// - a failed request or an undecodable payload
    /// - an empty page
    /// - a page shorter than the page size
    /// - a page identical to the previous one
    pub async fn fetch_comments(&self, post_id: &str) -> CommentThread {
        let page_size = self.site.comment_page_size.max(1);
        let mut comments = Vec::new();
        let mut previous: Option<Vec<Value>> = None;
        let mut page_index = 1u32;

        loop {
            let query = [
                ("appKey", self.site.comment_app_key.clone()),
                ("objId", post_id.to_string()),
                ("objType", "1".to_string()),
                ("pageindex", page_index.to_string()),
                ("pagesize", page_size.to_string()),
            ];

            let body = match self.fetcher.fetch_text(&self.site.comment_api, &query).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        "Comment page {} for {} failed: {}",
                        page_index,
                        post_id,
                        e
                    );
                    break;
                }
            };

            let Some(batch) = decode_comment_page(&body) else {
                tracing::warn!(
                    "Unreadable comment payload for {} on page {}",
                    post_id,
                    page_index
                );
                break;
            };

            if batch.is_empty() {
                break;
            }

            if previous.as_ref() == Some(&batch) {
                tracing::debug!("Comment page {} for {} repeats; stopping", page_index, post_id);
                break;
            }

            comments.extend(batch.iter().map(normalize_comment));

            if batch.len() < page_size {
                break;
            }

            previous = Some(batch);
            page_index += 1;
        }

        let total = count_comments(&comments);
        tracing::debug!("Collected {} comments for {}", total, post_id);
        CommentThread { comments, total }
    }
}
