//! Per-article records and their on-disk encoding

use crate::HarvestError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Reaction label to count
pub type Reactions = BTreeMap<String, u64>;

/// One harvested article, persisted as `<postId>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub post_id: String,
    pub title: String,
    /// Paragraph text joined by blank lines
    pub content: String,
    pub authors: Vec<String>,
    pub date: Option<String>,
    pub category: String,
    pub source_url: String,
    /// Paths relative to the audio root
    pub audio_files: Vec<String>,
    /// Paths relative to the image root
    pub image_files: Vec<String>,
    pub vote_reactions: Reactions,
    pub comments: Vec<CommentNode>,
}

impl ArticleRecord {
    /// Number of comments including every nested reply
    pub fn comment_count(&self) -> usize {
        count_comments(&self.comments)
    }
}

/// A normalized comment with its replies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    pub comment_id: String,
    pub author: Option<String>,
    pub text: Option<String>,
    pub date: Option<String>,
    pub vote_reactions: Reactions,
    pub replies: Vec<CommentNode>,
}

/// Counts every node of a comment forest
///
/// Walks the forest with an explicit stack so arbitrarily deep reply chains
/// cannot exhaust the call stack.
pub fn count_comments(forest: &[CommentNode]) -> usize {
    let mut stack: Vec<&CommentNode> = forest.iter().collect();
    let mut count = 0;

    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(node.replies.iter());
    }

    count
}

/// Writes a record as indented UTF-8 JSON to `<dir>/<postId>.json`
///
/// Non-ASCII text is written as-is rather than escaped.
pub async fn write_record(dir: &Path, record: &ArticleRecord) -> Result<PathBuf, HarvestError> {
    let path = dir.join(format!("{}.json", record.post_id));
    let json = serde_json::to_string_pretty(record)?;
    tokio::fs::write(&path, json).await?;
    Ok(path)
}
