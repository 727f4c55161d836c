use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tracing::warn;

use super::{eq_ignore_case, Catalogue, CatalogueError, Translation};
use crate::geometry::Ellipse;
use crate::sign::{Placement, ReferenceSign, SignType};
use crate::taxonomy::HandshapeId;

/// Tables read by `SqliteCatalogue`.
///
/// `sign.ellipse` is `"center_x,center_y,a,b,angle"`; `sign.placement` is the
/// run-length encoding and wins when both are present.
pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS sign (
    videofile     TEXT NOT NULL,
    shape1        INTEGER,
    shape2        INTEGER,
    signtype      TEXT NOT NULL,
    passive_shape INTEGER,
    ellipse       TEXT,
    placement     TEXT
);
CREATE TABLE IF NOT EXISTS translation (
    word      TEXT NOT NULL,
    videofile TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS words (
    word TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS translation_videofile ON translation(videofile);
";

/// Catalogue backed by the dictionary's SQLite database.
///
/// A read-only connection is opened per call, so the catalogue can be
/// shared between threads.
pub struct SqliteCatalogue {
    path: PathBuf,
}

struct SignRow {
    video_id: String,
    shapes: [Option<i64>; 2],
    sign_type: String,
    passive_shape: Option<i64>,
    ellipse: Option<String>,
    placement: Option<String>,
}

impl SqliteCatalogue {
    /// Open an existing database, checking that the expected tables exist.
    pub fn open(path: &Path) -> Result<Self, CatalogueError> {
        let catalogue = Self {
            path: path.to_path_buf(),
        };
        let conn = catalogue.connect()?;
        for table in ["sign", "translation", "words"] {
            let found: Option<String> = conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .optional()?;
            if found.is_none() {
                return Err(CatalogueError::Parse(format!(
                    "{}: missing table '{table}'",
                    path.display()
                )));
            }
        }
        Ok(catalogue)
    }

    /// Create the catalogue tables in `conn` if they are missing.
    pub fn init_schema(conn: &Connection) -> Result<(), CatalogueError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    fn connect(&self) -> Result<Connection, CatalogueError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }
}

fn shape_id(video_id: &str, raw: i64) -> Result<Option<HandshapeId>, CatalogueError> {
    let id = u8::try_from(raw).map_err(|_| {
        CatalogueError::Parse(format!("sign {video_id}: handshape id {raw} out of range"))
    })?;
    HandshapeId::optional(id).map_err(|source| CatalogueError::Taxonomy {
        video_id: video_id.to_string(),
        source,
    })
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl SignRow {
    fn into_sign(self) -> Result<ReferenceSign, CatalogueError> {
        let mut active_shapes = BTreeSet::new();
        for raw in self.shapes.into_iter().flatten() {
            if let Some(shape) = shape_id(&self.video_id, raw)? {
                active_shapes.insert(shape);
            }
        }
        let passive_shape = match self.passive_shape {
            Some(raw) => shape_id(&self.video_id, raw)?,
            None => None,
        };
        let sign_type: SignType = self.sign_type.parse().map_err(|e| {
            CatalogueError::Parse(format!("sign {}: {e}", self.video_id))
        })?;

        let placement = match (non_empty(self.placement), non_empty(self.ellipse)) {
            (Some(encoded), _) => Some(Placement::RunLength(encoded)),
            (None, Some(text)) => match text.parse::<Ellipse>() {
                Ok(ellipse) => Some(Placement::Ellipse(ellipse)),
                Err(e) => {
                    warn!(video_id = %self.video_id, error = %e, "ignoring malformed ellipse");
                    None
                }
            },
            (None, None) => None,
        };

        Ok(ReferenceSign {
            video_id: self.video_id,
            active_shapes,
            sign_type,
            passive_shape,
            placement,
        })
    }
}

impl Catalogue for SqliteCatalogue {
    fn load_all_signs(&self) -> Result<Vec<ReferenceSign>, CatalogueError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT videofile, shape1, shape2, signtype, passive_shape, ellipse, placement
             FROM sign ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SignRow {
                    video_id: row.get(0)?,
                    shapes: [row.get(1)?, row.get(2)?],
                    sign_type: row.get(3)?,
                    passive_shape: row.get(4)?,
                    ellipse: row.get(5)?,
                    placement: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(SignRow::into_sign).collect()
    }

    fn load_translation_words(&self, video_id: &str) -> Result<Vec<String>, CatalogueError> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT word FROM translation WHERE videofile = ?1 ORDER BY rowid")?;
        let words = stmt
            .query_map([video_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(words)
    }

    fn load_all_translations(&self) -> Result<Vec<Translation>, CatalogueError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT word, videofile FROM translation ORDER BY rowid")?;
        let translations = stmt
            .query_map([], |row| {
                Ok(Translation {
                    word: row.get(0)?,
                    video_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(translations)
    }

    fn load_all_words(&self) -> Result<Vec<String>, CatalogueError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT word FROM words ORDER BY rowid")?;
        let words = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(words)
    }

    /// SQLite's `lower()` only folds ASCII, so matching happens here.
    fn find_translations(&self, word: &str) -> Result<Vec<Translation>, CatalogueError> {
        Ok(self
            .load_all_translations()?
            .into_iter()
            .filter(|t| eq_ignore_case(&t.word, word))
            .collect())
    }
}
