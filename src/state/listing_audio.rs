//! Audio advertised by listing anchors rather than by the article body

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

/// Article URL to the audio URLs its listing anchors carried
///
/// Populated while scanning listing pages and consulted once per article when
/// its media list is assembled.
#[derive(Debug, Default)]
pub struct ListingAudioIndex {
    entries: Mutex<HashMap<String, Vec<String>>>,
}

impl ListingAudioIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an audio URL for an article URL, ignoring repeats
    pub fn record(&self, article_url: &str, audio_url: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let list = entries.entry(article_url.to_string()).or_default();
        if !list.iter().any(|existing| existing == audio_url) {
            list.push(audio_url.to_string());
        }
    }

    /// Audio URLs recorded for an article, in discovery order
    pub fn get(&self, article_url: &str) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(article_url).cloned().unwrap_or_default()
    }

    /// Merges body audio with the listing audio of the same article
    ///
    /// Body entries come first, listing entries after; the first occurrence of
    /// every URL wins.
    pub fn merge_for(&self, article_url: &str, body_audio: &[String]) -> Vec<String> {
        merge_unique(body_audio, &self.get(article_url))
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Concatenates two lists, dropping repeats while keeping first-seen order
pub fn merge_unique(first: &[String], second: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    first
        .iter()
        .chain(second.iter())
        .filter(|url| seen.insert(*url))
        .cloned()
        .collect()
}
