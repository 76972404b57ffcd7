//! Listing page parser
//!
//! Category listings render article links through several UI patterns. Each
//! pattern has its own selector; all of them are applied, in a fixed order,
//! and their hits are concatenated.

use crate::url::absolutize;
use scraper::{Html, Selector};
use url::Url;

/// Anchor selectors for the listing UI patterns, in scan order
pub const LISTING_SELECTORS: &[&str] = &[
    // Standard story cards
    ".box-category-item a.box-category-link-title",
    // Links tagged as article details
    r#"a[data-linktype="newsdetail"]"#,
    // Podcast / audio autoplay tiles
    r#"a[data-role="audio-autoplay"]"#,
];

/// A candidate article link found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingAnchor {
    /// Absolute article URL
    pub url: String,

    /// Absolute audio URL from the anchor's `data-file`, if any
    pub audio_url: Option<String>,
}

/// Extracts candidate article anchors from a listing page
///
/// # Rules
///
/// - Anchors without an href, or with `#`, are skipped
/// - Relative hrefs are resolved against `base`
/// - The same URL may appear more than once (once per matching pattern);
///   deduplication is left to the caller
///
/// # Example
///
/// ```
/// use tuoitre_harvester::crawler::extract_listing_anchors;
/// use url::Url;
///
/// let html = r#"<div class="box-category-item">
///     <a class="box-category-link-title" href="/tin-20240101123456789.htm">Tin</a>
/// </div>"#;
/// let base = Url::parse("https://tuoitre.vn").unwrap();
/// let anchors = extract_listing_anchors(html, &base);
/// assert_eq!(anchors[0].url, "https://tuoitre.vn/tin-20240101123456789.htm");
/// ```
pub fn extract_listing_anchors(html: &str, base: &Url) -> Vec<ListingAnchor> {
    let document = Html::parse_document(html);
    let mut anchors = Vec::new();

    for css in LISTING_SELECTORS {
        let Ok(anchor_selector) = Selector::parse(css) else {
            tracing::error!("Invalid listing selector {:?}", css);
            continue;
        };

        for element in document.select(&anchor_selector) {
            let Some(url) = element
                .value()
                .attr("href")
                .and_then(|href| absolutize(base, href))
            else {
                continue;
            };

            let audio_url = element
                .value()
                .attr("data-file")
                .and_then(|file| absolutize(base, file));

            anchors.push(ListingAnchor { url, audio_url });
        }
    }

    anchors
}
