//! Exact word lookup, the text-search sibling of sign matching.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::catalogue::{Catalogue, CatalogueError};
use crate::video::VideoDirectory;

/// One translation of a looked-up word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordMatch {
    /// The word as stored in the catalogue.
    pub word: String,
    pub video_id: String,
    /// `None` when no file in the video directory matches `video_id`.
    pub video: Option<PathBuf>,
}

pub struct WordLookup {
    catalogue: Arc<dyn Catalogue>,
    videos: VideoDirectory,
}

impl WordLookup {
    pub fn new(catalogue: Arc<dyn Catalogue>, videos: VideoDirectory) -> Self {
        Self { catalogue, videos }
    }

    /// Translations whose word equals `word`, ignoring case, in catalogue
    /// order. An unknown word gives an empty list.
    pub fn lookup(&self, word: &str) -> Result<Vec<WordMatch>, CatalogueError> {
        let word = word.trim();
        if word.is_empty() {
            return Ok(Vec::new());
        }
        let found = self.catalogue.find_translations(word)?;
        debug!(word, matches = found.len(), "word lookup");
        Ok(found
            .into_iter()
            .map(|t| WordMatch {
                video: self.videos.resolve(&t.video_id),
                word: t.word,
                video_id: t.video_id,
            })
            .collect())
    }

    /// The catalogue's word list in display order (see `sort_words`).
    pub fn sorted_words(&self) -> Result<Vec<String>, CatalogueError> {
        let mut words = self.catalogue.load_all_words()?;
        sort_words(&mut words);
        Ok(words)
    }
}

/// Order words case-insensitively, with words starting with a digit moved
/// to the end. The sort is stable.
pub fn sort_words(words: &mut [String]) {
    words.sort_by_cached_key(|w| {
        let digit_first = w.chars().next().is_some_and(char::is_numeric);
        (digit_first, w.to_lowercase())
    });
}
