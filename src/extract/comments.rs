//! Comment API payload decoding and normalization
//!
//! The endpoint wraps the comment array in a JSON string field, so a page is
//! decoded twice: once for the envelope and once for the embedded array.

use super::labels::{lookup, COMMENT_REACTION_LABELS};
use crate::output::{CommentNode, Reactions};
use serde_json::Value;

/// Envelope field carrying the JSON-encoded comment array
const DATA_FIELD: &str = "Data";

/// Decodes one page of the comment API
///
/// # Returns
///
/// * `Some(Vec<Value>)` - The raw comments of the page (possibly empty)
/// * `None` - Either layer could not be parsed; callers treat this as the end
///   of the data
pub fn decode_comment_page(body: &str) -> Option<Vec<Value>> {
    let envelope: Value = serde_json::from_str(body).ok()?;

    match envelope.get(DATA_FIELD) {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::String(embedded)) if embedded.trim().is_empty() => Some(Vec::new()),
        Some(Value::String(embedded)) => serde_json::from_str(embedded).ok(),
        Some(Value::Array(items)) => Some(items.clone()),
        Some(_) => None,
    }
}

/// Normalizes a raw comment and, recursively, its `child_comments`
///
/// Depth follows the source data. The JSON decoder's nesting limit already
/// caps how deep a decoded payload can be, which bounds the recursion here.
pub fn normalize_comment(raw: &Value) -> CommentNode {
    let replies = raw
        .get("child_comments")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(normalize_comment).collect())
        .unwrap_or_default();

    CommentNode {
        comment_id: scalar_to_string(raw.get("id")).unwrap_or_default(),
        author: scalar_to_string(raw.get("sender_fullname")),
        text: scalar_to_string(raw.get("content")),
        date: scalar_to_string(raw.get("created_date")),
        vote_reactions: comment_reactions(raw.get("reactions")),
        replies,
    }
}

/// Maps the numeric keys of a comment's `reactions` object to labels
///
/// Keys outside the comment table and zero counts are dropped.
fn comment_reactions(raw: Option<&Value>) -> Reactions {
    let mut reactions = Reactions::new();
    let Some(Value::Object(map)) = raw else {
        return reactions;
    };

    for (key, value) in map {
        let Some(label) = lookup(COMMENT_REACTION_LABELS, key) else {
            continue;
        };
        let count = reaction_count(value);
        if count > 0 {
            reactions.insert(label.to_string(), count);
        }
    }

    reactions
}

fn reaction_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
