use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Catalogue, CatalogueError, MemoryCatalogue, Translation};
use crate::geometry::{encode_run_length, rasterize};
use crate::sign::{Placement, ReferenceSign};

pub(super) const MAGIC: &[u8; 4] = b"ZNCT";
const VERSION: u8 = 1;

/// Flat serialization format for bincode.
#[derive(Serialize, Deserialize)]
struct SnapshotData {
    signs: Vec<ReferenceSign>,
    translations: Vec<Translation>,
    words: Vec<String>,
}

impl MemoryCatalogue {
    /// Serialize to bytes (ZNCT format).
    pub fn to_bytes(&self) -> Result<Vec<u8>, CatalogueError> {
        let data = SnapshotData {
            signs: self.signs.clone(),
            translations: self.translations.clone(),
            words: self.words.clone(),
        };
        let body = bincode::serialize(&data).map_err(CatalogueError::Serialize)?;
        let mut buf = Vec::with_capacity(5 + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Deserialize from bytes (ZNCT format).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CatalogueError> {
        if bytes.len() < 5 {
            return Err(CatalogueError::InvalidHeader);
        }
        if &bytes[0..4] != MAGIC {
            return Err(CatalogueError::InvalidMagic);
        }
        if bytes[4] != VERSION {
            return Err(CatalogueError::UnsupportedVersion(bytes[4]));
        }
        let data: SnapshotData =
            bincode::deserialize(&bytes[5..]).map_err(CatalogueError::Deserialize)?;
        Ok(Self::new(data.signs, data.translations, data.words))
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), CatalogueError> {
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn open(path: &Path) -> Result<Self, CatalogueError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

/// Copy `source` into memory, pre-rasterizing ellipse placements into the
/// run-length form for a `width × height` canvas.
///
/// Ellipses whose raster has a row with more than one run cannot be
/// run-length encoded and are kept as ellipses.
pub fn compile_snapshot(
    source: &dyn Catalogue,
    width: usize,
    height: usize,
) -> Result<MemoryCatalogue, CatalogueError> {
    let mut signs = source.load_all_signs()?;
    for sign in &mut signs {
        if let Some(Placement::Ellipse(ellipse)) = &sign.placement {
            match encode_run_length(&rasterize(ellipse, width, height)) {
                Ok(encoded) => sign.placement = Some(Placement::RunLength(encoded)),
                Err(e) => warn!(video_id = %sign.video_id, error = %e, "keeping ellipse placement"),
            }
        }
    }

    Ok(MemoryCatalogue::new(
        signs,
        source.load_all_translations()?,
        source.load_all_words()?,
    ))
}
