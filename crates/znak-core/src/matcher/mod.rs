//! Ranked search over the reference-sign catalogue.
//!
//! `SignMatcher` loads and indexes the catalogue once at construction.
//! A search scores every reference sign against the query, sorts by the
//! summed distance, keeps the best `signs_max`, drops repeated videos and
//! resolves display text and video files for the survivors.

mod display;
mod index;
#[cfg(test)]
mod tests;

pub use display::display_text;

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, debug_span, error, info, warn};

use crate::catalogue::{Catalogue, CatalogueError};
use crate::distance::{
    active_shape_distance, placement_distance, sign_type_distance, SignDistance, NO_PLACEMENT,
};
use crate::geometry::rasterize;
use crate::settings::Settings;
use crate::sign::UserSign;
use crate::taxonomy::{groups_of, ShapeGroup};
use crate::video::VideoDirectory;
use index::{IndexedSign, PlacementRaster};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Ranked signs kept before removing repeated videos.
    pub signs_max: usize,
    /// Display width available for the joined translation words.
    pub display_max_len: usize,
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// Score reference signs on the rayon pool.
    pub parallel: bool,
}

impl MatchOptions {
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            signs_max: s.search.signs_max,
            display_max_len: s.search.display_max_len,
            canvas_width: s.canvas.width,
            canvas_height: s.canvas.height,
            parallel: s.search.parallel,
        }
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            signs_max: 12,
            display_max_len: 40,
            canvas_width: 240,
            canvas_height: 250,
            parallel: true,
        }
    }
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignMatch {
    /// Translation words joined for display; empty when the video has none.
    pub text: String,
    pub video_id: String,
    pub video: Option<PathBuf>,
    pub distance: SignDistance,
}

/// The user's sketch, prepared once per search.
struct Query<'a> {
    sign: &'a UserSign,
    groups: BTreeSet<ShapeGroup>,
    placement: Option<PlacementRaster>,
}

impl<'a> Query<'a> {
    fn new(sign: &'a UserSign, options: &MatchOptions) -> Self {
        let placement = sign.placement.as_ref().map(|ellipse| {
            PlacementRaster::new(rasterize(
                ellipse,
                options.canvas_width,
                options.canvas_height,
            ))
        });
        Self {
            sign,
            groups: groups_of(&sign.active_shapes),
            placement,
        }
    }

    fn score(&self, db: &IndexedSign) -> SignDistance {
        let placement = match (&self.placement, &db.placement) {
            (Some(user), Some(db)) => {
                placement_distance(&user.raster, user.area, &db.raster, db.area)
            }
            _ => NO_PLACEMENT,
        };
        SignDistance {
            active: active_shape_distance(
                &self.sign.active_shapes,
                &self.groups,
                &db.active_shapes,
                &db.groups,
            ),
            sign_type: sign_type_distance(
                self.sign.sign_type,
                self.sign.passive_shape,
                db.sign_type,
                db.passive_shape,
            ),
            placement,
        }
    }
}

pub struct SignMatcher {
    index: Vec<IndexedSign>,
    catalogue: Arc<dyn Catalogue>,
    videos: VideoDirectory,
    options: MatchOptions,
}

impl SignMatcher {
    /// Load and index the catalogue. A load failure is logged and leaves
    /// the matcher empty, so every search returns no results.
    pub fn new(
        catalogue: Arc<dyn Catalogue>,
        videos: VideoDirectory,
        options: MatchOptions,
    ) -> Self {
        match Self::try_new(Arc::clone(&catalogue), videos.clone(), options) {
            Ok(matcher) => matcher,
            Err(e) => {
                error!(error = %e, "failed to load sign catalogue");
                Self {
                    index: Vec::new(),
                    catalogue,
                    videos,
                    options,
                }
            }
        }
    }

    pub fn try_new(
        catalogue: Arc<dyn Catalogue>,
        videos: VideoDirectory,
        options: MatchOptions,
    ) -> Result<Self, CatalogueError> {
        let started = Instant::now();
        let index: Vec<IndexedSign> = catalogue
            .load_all_signs()?
            .into_iter()
            .map(|sign| IndexedSign::new(sign, options.canvas_width, options.canvas_height))
            .collect();
        info!(
            signs = index.len(),
            placements = index.iter().filter(|s| s.placement.is_some()).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sign catalogue indexed"
        );
        Ok(Self {
            index,
            catalogue,
            videos,
            options,
        })
    }

    /// Number of indexed reference signs.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Rank the catalogue against `user`, best match first.
    ///
    /// Equal totals keep catalogue order. At most `signs_max` signs are
    /// ranked; a video that appears again further down is dropped, so
    /// fewer results may come back.
    pub fn search(&self, user: &UserSign) -> Vec<SignMatch> {
        let _span = debug_span!("sign_search", catalogue = self.index.len()).entered();
        let started = Instant::now();
        let query = Query::new(user, &self.options);

        let mut scored: Vec<(usize, SignDistance)> = if self.options.parallel {
            self.index
                .par_iter()
                .enumerate()
                .map(|(i, sign)| (i, query.score(sign)))
                .collect()
        } else {
            self.index
                .iter()
                .enumerate()
                .map(|(i, sign)| (i, query.score(sign)))
                .collect()
        };
        scored.sort_by(|a, b| a.1.total().total_cmp(&b.1.total()));
        scored.truncate(self.options.signs_max);

        let mut seen = HashSet::new();
        scored.retain(|(i, _)| seen.insert(self.index[*i].video_id.as_str()));

        let results: Vec<SignMatch> = scored
            .into_iter()
            .map(|(i, distance)| {
                let video_id = &self.index[i].video_id;
                SignMatch {
                    text: self.display_text_for(video_id),
                    video_id: video_id.clone(),
                    video: self.videos.resolve(video_id),
                    distance,
                }
            })
            .collect();
        debug!(
            scored = self.index.len(),
            returned = results.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "sign search done"
        );
        results
    }

    fn display_text_for(&self, video_id: &str) -> String {
        match self.catalogue.load_translation_words(video_id) {
            Ok(words) if words.is_empty() => {
                warn!(video_id, "sign has no translation");
                String::new()
            }
            Ok(words) => display_text(&words, self.options.display_max_len),
            Err(e) => {
                warn!(video_id, error = %e, "failed to load translations");
                String::new()
            }
        }
    }
}
