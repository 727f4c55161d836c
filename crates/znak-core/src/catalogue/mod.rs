//! Reference-sign catalogue storage.
//!
//! `SqliteCatalogue` reads the dictionary database directly.
//! `MemoryCatalogue` holds everything in memory and is what a compiled
//! snapshot (ZNCT) loads into.

mod memory;
mod snapshot;
mod sqlite;

pub use memory::MemoryCatalogue;
pub use snapshot::compile_snapshot;
pub use sqlite::{SqliteCatalogue, SCHEMA_SQL};

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sign::ReferenceSign;
use crate::taxonomy::TaxonomyError;

/// Unified error type for catalogue access, covering both the SQLite
/// database and ZNCT snapshot files.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected ZNCT)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("sign {video_id}: {source}")]
    Taxonomy {
        video_id: String,
        source: TaxonomyError,
    },

    #[error("parse error: {0}")]
    Parse(String),
}

/// A word and the video that translates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub word: String,
    pub video_id: String,
}

pub trait Catalogue: Send + Sync {
    /// Every reference sign, in catalogue order.
    fn load_all_signs(&self) -> Result<Vec<ReferenceSign>, CatalogueError>;

    /// Words translated by `video_id`, in catalogue order.
    fn load_translation_words(&self, video_id: &str) -> Result<Vec<String>, CatalogueError>;

    /// Every translation, in catalogue order.
    fn load_all_translations(&self) -> Result<Vec<Translation>, CatalogueError>;

    /// The full word list.
    fn load_all_words(&self) -> Result<Vec<String>, CatalogueError>;

    /// Translations whose word equals `word`, ignoring case.
    fn find_translations(&self, word: &str) -> Result<Vec<Translation>, CatalogueError>;
}

/// Open a catalogue file, choosing the backend by its magic bytes: ZNCT
/// snapshots load into memory, anything else is opened as SQLite.
pub fn open_catalogue(path: &Path) -> Result<Arc<dyn Catalogue>, CatalogueError> {
    let mut magic = [0u8; 4];
    let is_snapshot = match File::open(path)?.read_exact(&mut magic) {
        Ok(()) => &magic == snapshot::MAGIC,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(e.into()),
    };
    if is_snapshot {
        Ok(Arc::new(MemoryCatalogue::open(path)?))
    } else {
        Ok(Arc::new(SqliteCatalogue::open(path)?))
    }
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
