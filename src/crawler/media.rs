//! Media downloads and their on-disk naming
//!
//! Images land in `<images_root>/<postId>/<filename>`; audio lands directly in
//! `<audio_root>` named after the post. Download failures are logged and the
//! file is left out of the record.

use crate::crawler::fetcher::Fetcher;
use crate::url::{extension_from_url, filename_from_url};
use std::collections::HashSet;
use std::path::Path;

/// Extension used when an audio URL carries none
pub const DEFAULT_AUDIO_EXT: &str = ".mp3";

/// File name for the `index`-th audio file of a post
///
/// The first file is `<postId><ext>`, later ones `<postId>_<index+1><ext>`.
///
/// ```
/// use tuoitre_harvester::crawler::audio_file_name;
///
/// assert_eq!(audio_file_name("123", 0, "https://cdn/x.m4a"), "123.m4a");
/// assert_eq!(audio_file_name("123", 1, "https://cdn/y"), "123_2.mp3");
/// ```
pub fn audio_file_name(post_id: &str, index: usize, url: &str) -> String {
    let ext = extension_from_url(url).unwrap_or_else(|| DEFAULT_AUDIO_EXT.to_string());
    if index == 0 {
        format!("{}{}", post_id, ext)
    } else {
        format!("{}_{}{}", post_id, index + 1, ext)
    }
}

/// Downloads an article's images and audio under the configured roots
pub struct MediaDownloader<'a> {
    fetcher: &'a Fetcher,
    images_root: &'a Path,
    audio_root: &'a Path,
}

impl<'a> MediaDownloader<'a> {
    pub fn new(fetcher: &'a Fetcher, images_root: &'a Path, audio_root: &'a Path) -> Self {
        Self {
            fetcher,
            images_root,
            audio_root,
        }
    }

    /// Downloads images, returning `<postId>/<filename>` for each saved file
    ///
    /// URLs without a usable file name are skipped, as are later URLs that
    /// map onto a file name already taken by this post.
    pub async fn download_images(&self, post_id: &str, urls: &[String]) -> Vec<String> {
        let post_dir = self.images_root.join(post_id);
        let mut taken = HashSet::new();
        let mut saved = Vec::new();

        for url in urls {
            let Some(name) = filename_from_url(url) else {
                tracing::debug!("No file name in image URL {}", url);
                continue;
            };
            if !taken.insert(name.clone()) {
                continue;
            }

            if self.save(url, &post_dir.join(&name)).await {
                saved.push(format!("{}/{}", post_id, name));
            }
        }

        saved
    }

    /// Downloads audio, returning names relative to the audio root
    pub async fn download_audio(&self, post_id: &str, urls: &[String]) -> Vec<String> {
        let mut saved = Vec::new();

        for (index, url) in urls.iter().enumerate() {
            let name = audio_file_name(post_id, index, url);
            if self.save(url, &self.audio_root.join(&name)).await {
                saved.push(name);
            }
        }

        saved
    }

    async fn save(&self, url: &str, dest: &Path) -> bool {
        match self.fetcher.download(url, dest).await {
            Ok(bytes) => {
                tracing::debug!("Saved {} ({} bytes) to {}", url, bytes, dest.display());
                true
            }
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", url, e);
                false
            }
        }
    }
}
