//! Field extractors for article pages and comment payloads
//!
//! Every extractor is a pure function of a parsed document (or a raw comment
//! value). Fields that cannot be found come back absent; nothing here fails.

mod comments;
mod content;
pub mod labels;
mod metadata;
mod post_id;
mod reactions;

pub use comments::{decode_comment_page, normalize_comment};
pub use content::{extract_content, ArticleContent};
pub use metadata::{extract_metadata, ArticleMetadata};
pub use post_id::extract_post_id;
pub use reactions::{extract_reactions, parse_counter};

use crate::output::Reactions;
use scraper::{Html, Selector};
use url::Url;

/// A fetched article page, parsed once and queried by every extractor
pub struct ArticleDocument<'a> {
    document: Html,
    raw_html: &'a str,
    url: &'a str,
}

impl<'a> ArticleDocument<'a> {
    pub fn parse(raw_html: &'a str, url: &'a str) -> Self {
        Self {
            document: Html::parse_document(raw_html),
            raw_html,
            url,
        }
    }

    pub fn post_id(&self) -> Option<String> {
        extract_post_id(&self.document, self.raw_html, self.url)
    }

    pub fn metadata(&self) -> ArticleMetadata {
        extract_metadata(&self.document)
    }

    pub fn content(&self, base: &Url) -> ArticleContent {
        extract_content(&self.document, base)
    }

    pub fn reactions(&self) -> Reactions {
        extract_reactions(&self.document)
    }
}

/// Parses a CSS selector, logging selectors that fail to compile
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::error!("Invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}

/// Returns the trimmed `content` of `<meta property="...">`, if non-empty
pub(crate) fn meta_content(document: &Html, property: &str) -> Option<String> {
    let meta_selector = selector(&format!(r#"meta[property="{}"]"#, property))?;

    document
        .select(&meta_selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

/// Joins text nodes with single spaces, collapsing all runs of whitespace
pub(crate) fn collapse_whitespace<'t>(texts: impl Iterator<Item = &'t str>) -> String {
    texts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
