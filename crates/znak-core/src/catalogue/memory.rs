use super::{eq_ignore_case, Catalogue, CatalogueError, Translation};
use crate::sign::ReferenceSign;

/// In-memory catalogue. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryCatalogue {
    pub(super) signs: Vec<ReferenceSign>,
    pub(super) translations: Vec<Translation>,
    pub(super) words: Vec<String>,
}

impl MemoryCatalogue {
    pub fn new(
        signs: Vec<ReferenceSign>,
        translations: Vec<Translation>,
        words: Vec<String>,
    ) -> Self {
        Self {
            signs,
            translations,
            words,
        }
    }

    pub fn signs(&self) -> &[ReferenceSign] {
        &self.signs
    }

    pub fn translations(&self) -> &[Translation] {
        &self.translations
    }
}

impl Catalogue for MemoryCatalogue {
    fn load_all_signs(&self) -> Result<Vec<ReferenceSign>, CatalogueError> {
        Ok(self.signs.clone())
    }

    fn load_translation_words(&self, video_id: &str) -> Result<Vec<String>, CatalogueError> {
        Ok(self
            .translations
            .iter()
            .filter(|t| t.video_id == video_id)
            .map(|t| t.word.clone())
            .collect())
    }

    fn load_all_translations(&self) -> Result<Vec<Translation>, CatalogueError> {
        Ok(self.translations.clone())
    }

    fn load_all_words(&self) -> Result<Vec<String>, CatalogueError> {
        Ok(self.words.clone())
    }

    fn find_translations(&self, word: &str) -> Result<Vec<Translation>, CatalogueError> {
        Ok(self
            .translations
            .iter()
            .filter(|t| eq_ignore_case(&t.word, word))
            .cloned()
            .collect())
    }
}
