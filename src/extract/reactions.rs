use super::labels::article_reaction_label;
use super::selector;
use crate::output::Reactions;
use scraper::Html;

/// Reaction counters rendered under an article
const REACTION_SPANS: &str = ".formreactdetail .reactinfo span[data-viewreactid]";

/// Extracts article reaction counts keyed by label
///
/// Only reactions present in the markup are returned.
pub fn extract_reactions(document: &Html) -> Reactions {
    let mut reactions = Reactions::new();
    let Some(span_selector) = selector(REACTION_SPANS) else {
        return reactions;
    };

    for span in document.select(&span_selector) {
        let Some(code) = span.value().attr("data-viewreactid") else {
            continue;
        };
        let counter = span.text().collect::<String>();
        reactions.insert(article_reaction_label(code.trim()), parse_counter(&counter));
    }

    reactions
}

/// Parses a displayed counter, ignoring every non-digit character
///
/// Thousands separators and non-breaking spaces are dropped; an empty result
/// (or one too large for u64) counts as zero.
pub fn parse_counter(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}
