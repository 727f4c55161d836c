use std::collections::BTreeSet;

use tracing::warn;

use crate::geometry::{decode_run_length, rasterize, Raster};
use crate::sign::{Placement, ReferenceSign, SignType};
use crate::taxonomy::{groups_of, HandshapeId, ShapeGroup};

/// A placement raster with its precomputed area.
#[derive(Debug, Clone)]
pub(super) struct PlacementRaster {
    pub raster: Raster,
    pub area: u32,
}

impl PlacementRaster {
    pub fn new(raster: Raster) -> Self {
        let area = raster.area();
        Self { raster, area }
    }
}

/// A reference sign prepared for scoring: groups derived and placement
/// rasterized once, when the matcher is built.
#[derive(Debug, Clone)]
pub(super) struct IndexedSign {
    pub video_id: String,
    pub active_shapes: BTreeSet<HandshapeId>,
    pub groups: BTreeSet<ShapeGroup>,
    pub sign_type: SignType,
    pub passive_shape: Option<HandshapeId>,
    pub placement: Option<PlacementRaster>,
}

impl IndexedSign {
    pub fn new(sign: ReferenceSign, width: usize, height: usize) -> Self {
        let placement = match &sign.placement {
            Some(Placement::Ellipse(ellipse)) => {
                Some(PlacementRaster::new(rasterize(ellipse, width, height)))
            }
            Some(Placement::RunLength(encoded)) => {
                match decode_run_length(encoded, width, height) {
                    Ok(raster) => Some(PlacementRaster::new(raster)),
                    Err(e) => {
                        warn!(video_id = %sign.video_id, error = %e, "malformed placement encoding");
                        None
                    }
                }
            }
            None => None,
        };
        Self {
            groups: groups_of(&sign.active_shapes),
            video_id: sign.video_id,
            active_shapes: sign.active_shapes,
            sign_type: sign.sign_type,
            passive_shape: sign.passive_shape,
            placement,
        }
    }
}
