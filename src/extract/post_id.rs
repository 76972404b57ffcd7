//! Post id discovery
//!
//! The id is tried from three independent sources, in order, and the first
//! hit made only of ASCII digits wins. The id becomes a file name stem, so
//! anything else is ignored:
//! 1. the `dable:item_id` meta tag
//! 2. an `articleId` assignment inside an inline script (10+ digits)
//! 3. the last run of 8+ digits in the article URL

use super::meta_content;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

/// One way of finding the post id
type PostIdStrategy = fn(&Html, &str, &str) -> Option<String>;

const POST_ID_STRATEGIES: &[PostIdStrategy] = &[from_meta_tag, from_script_variable, from_url];

static SCRIPT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"articleId'?:\s*'?(\d{10,})").expect("valid regex"));

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{8,}").expect("valid regex"));

/// Extracts the post id of an article
///
/// # Arguments
///
/// * `document` - The parsed article
/// * `raw_html` - The unparsed article markup (scanned for script variables)
/// * `url` - The article URL
///
/// # Returns
///
/// * `Some(String)` - The first id any strategy produced
/// * `None` - The article cannot be identified and should be skipped
pub fn extract_post_id(document: &Html, raw_html: &str, url: &str) -> Option<String> {
    POST_ID_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(document, raw_html, url).filter(|id| is_numeric_id(id)))
}

fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

fn from_meta_tag(document: &Html, _raw_html: &str, _url: &str) -> Option<String> {
    meta_content(document, "dable:item_id")
}

fn from_script_variable(_document: &Html, raw_html: &str, _url: &str) -> Option<String> {
    SCRIPT_ID
        .captures(raw_html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn from_url(_document: &Html, _raw_html: &str, url: &str) -> Option<String> {
    DIGIT_RUN.find_iter(url).last().map(|m| m.as_str().to_string())
}
