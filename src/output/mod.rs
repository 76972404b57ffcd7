//! Output module for article records and run summaries
//!
//! This module handles:
//! - The ArticleRecord / CommentNode data model and its JSON encoding
//! - Writing one record file per article
//! - Aggregating, printing and exporting the run summary

mod record;
pub mod summary;

pub use record::{count_comments, write_record, ArticleRecord, CommentNode, Reactions};
pub use summary::{print_summary, write_summary, CategorySummary, RunSummary};
