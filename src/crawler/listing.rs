//! Category listing discovery
//!
//! Walks `page 1, 2, ...` of one category until enough unique article URLs
//! are collected or the listing stops producing new ones.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_listing_anchors;
use crate::state::ListingAudioIndex;
use crate::url::page_url;
use std::collections::HashSet;
use url::Url;

/// Collects article URLs from one category's paginated listing
pub struct ListingDiscoverer<'a> {
    fetcher: &'a Fetcher,
    base: &'a Url,
    audio_index: &'a ListingAudioIndex,
}

impl<'a> ListingDiscoverer<'a> {
    pub fn new(fetcher: &'a Fetcher, base: &'a Url, audio_index: &'a ListingAudioIndex) -> Self {
        Self {
            fetcher,
            base,
            audio_index,
        }
    }

    /// Discovers up to `target` unique article URLs, in listing order
    ///
    /// Stops when:
    /// - `target` URLs have been collected
    /// - a listing page cannot be fetched (what was collected is returned)
    /// - a page has no candidate anchors at all
    /// - a page adds no URL that was not already collected, which also ends
    ///   listings that repeat the same page forever
    ///
    /// Audio advertised by an anchor is recorded for every anchor on the
    /// page, before deduplication and regardless of the target.
    pub async fn discover(&self, category_url: &str, target: usize) -> Vec<String> {
        let mut collected: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page = 1u32;

        while collected.len() < target {
            let url = page_url(category_url, page);
            let Some(html) = self.fetcher.fetch_html(&url).await else {
                tracing::info!("Stopping discovery of {} at page {}", category_url, page);
                break;
            };

            let anchors = extract_listing_anchors(&html, self.base);
            tracing::debug!(
                "Found {} candidates on page {} of {}",
                anchors.len(),
                page,
                category_url
            );

            if anchors.is_empty() {
                tracing::info!("No more posts on {}", url);
                break;
            }

            for anchor in &anchors {
                if let Some(audio_url) = &anchor.audio_url {
                    self.audio_index.record(&anchor.url, audio_url);
                }
            }

            let before = collected.len();
            for anchor in anchors {
                if collected.len() >= target {
                    break;
                }
                if seen.insert(anchor.url.clone()) {
                    collected.push(anchor.url);
                }
            }

            if collected.len() == before {
                tracing::info!("Page {} of {} added no new posts", page, category_url);
                break;
            }

            page += 1;
        }

        collected
    }
}
