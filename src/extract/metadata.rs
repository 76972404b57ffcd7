use super::{collapse_whitespace, meta_content, selector};
use scraper::Html;

/// Descriptive fields of an article
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub date: Option<String>,
    /// Absent when the page omits it; the pipeline substitutes the listing slug
    pub category: Option<String>,
}

/// Extracts title, authors, publication date and category
///
/// - title: `og:title`, then the `<title>` element
/// - authors: every `.detail-author .name`, then the `article:author` meta tag
/// - date: `article:published_time`
/// - category: `article:section`
pub fn extract_metadata(document: &Html) -> ArticleMetadata {
    let title = meta_content(document, "og:title").or_else(|| title_element(document));

    let mut authors = author_names(document);
    if authors.is_empty() {
        authors.extend(meta_content(document, "article:author"));
    }

    ArticleMetadata {
        title,
        authors,
        date: meta_content(document, "article:published_time"),
        category: meta_content(document, "article:section"),
    }
}

fn title_element(document: &Html) -> Option<String> {
    let title_selector = selector("title")?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn author_names(document: &Html) -> Vec<String> {
    let Some(name_selector) = selector(".detail-author .name") else {
        return Vec::new();
    };

    document
        .select(&name_selector)
        .map(|element| collapse_whitespace(element.text()))
        .filter(|name| !name.is_empty())
        .collect()
}
