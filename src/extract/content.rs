//! Article body, image and audio extraction

use super::{collapse_whitespace, selector};
use crate::url::absolutize;
use scraper::{ElementRef, Html};
use url::Url;

/// Elements whose text makes up the article body
const TEXT_BLOCKS: &str = "p, li, blockquote, h2, h3";

/// Elements exposing audio through a data attribute
const AUDIO_COMPONENTS: &str = r#"[data-type="audio"], [data-component="audio"]"#;

/// Body text and media URLs of an article
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleContent {
    /// Text blocks joined by a blank line
    pub text: String,
    /// Absolute image URLs in document order
    pub images: Vec<String>,
    /// Absolute audio URLs in document order; may repeat
    pub audio: Vec<String>,
}

/// Extracts body text, images and audio from the content root
///
/// The content root is the `[data-role="content"]` element. Without one the
/// whole document is scanned, which picks up navigation text but never fails.
pub fn extract_content(document: &Html, base: &Url) -> ArticleContent {
    let root = content_root(document);

    ArticleContent {
        text: body_text(root),
        images: image_urls(root, base),
        audio: audio_urls(root, base),
    }
}

fn content_root(document: &Html) -> ElementRef<'_> {
    selector(r#"[data-role="content"]"#)
        .and_then(|root_selector| document.select(&root_selector).next())
        .unwrap_or_else(|| document.root_element())
}

fn body_text(root: ElementRef<'_>) -> String {
    let Some(block_selector) = selector(TEXT_BLOCKS) else {
        return String::new();
    };

    root.select(&block_selector)
        .map(|block| collapse_whitespace(block.text()))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn image_urls(root: ElementRef<'_>, base: &Url) -> Vec<String> {
    let Some(img_selector) = selector("img") else {
        return Vec::new();
    };

    root.select(&img_selector)
        .filter_map(|img| non_empty_attr(img, "data-src").or_else(|| non_empty_attr(img, "src")))
        .filter(|src| !src.starts_with("data:"))
        .filter_map(|src| absolutize(base, src))
        .collect()
}

fn audio_urls(root: ElementRef<'_>, base: &Url) -> Vec<String> {
    let mut urls = Vec::new();

    // Explicit <audio> players, either with src or a nested <source>
    if let (Some(audio_selector), Some(source_selector)) = (selector("audio"), selector("source"))
    {
        for audio in root.select(&audio_selector) {
            let src = non_empty_attr(audio, "src").or_else(|| {
                audio
                    .select(&source_selector)
                    .next()
                    .and_then(|source| non_empty_attr(source, "src"))
            });
            urls.extend(src.and_then(|src| absolutize(base, src)));
        }
    }

    // Generic audio components
    if let Some(component_selector) = selector(AUDIO_COMPONENTS) {
        for component in root.select(&component_selector) {
            let src = non_empty_attr(component, "data-src")
                .or_else(|| non_empty_attr(component, "data-url"));
            urls.extend(src.and_then(|src| absolutize(base, src)));
        }
    }

    urls
}

fn non_empty_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
