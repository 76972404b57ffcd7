//! Reaction code tables
//!
//! Article reactions and comment reactions use unrelated code spaces; a code
//! from one table must never be looked up in the other.

/// `data-viewreactid` codes shown under an article
pub const ARTICLE_REACTION_LABELS: &[(&str, &str)] = &[
    ("1", "star"),
    ("2", "like"),
    ("3", "love"),
    ("4", "haha"),
    ("5", "sad"),
    ("6", "wow"),
];

/// Keys of the `reactions` object in comment API payloads
pub const COMMENT_REACTION_LABELS: &[(&str, &str)] = &[
    ("1", "like"),
    ("3", "love"),
    ("5", "haha"),
    ("7", "sad"),
    ("9", "wow"),
    ("11", "angry"),
    ("13", "star"),
];

/// Label for an article reaction code; unknown codes become `reaction_<code>`
pub fn article_reaction_label(code: &str) -> String {
    lookup(ARTICLE_REACTION_LABELS, code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("reaction_{}", code))
}

pub(crate) fn lookup(table: &[(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, label)| *label)
}
