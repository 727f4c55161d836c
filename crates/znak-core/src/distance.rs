//! Per-dimension sign distances, each in `[0, 1]`.
//!
//! A search ranks reference signs by the plain sum of the three
//! dimensions (see `SignDistance::total`).

use std::collections::BTreeSet;

use serde::Serialize;

use crate::geometry::Raster;
use crate::sign::SignType;
use crate::taxonomy::HandshapeId;

/// Distance of handshapes that are identical.
pub const SAME_SHAPES: f64 = 0.0;
/// At least one shared shape, and the remaining shapes are in the same groups.
pub const SHARED_SHAPE_SAME_GROUPS: f64 = 0.25;
/// No shared shape, but the same set of groups.
pub const SAME_GROUPS: f64 = 0.5;
/// At least one group in common.
pub const SHARED_GROUP: f64 = 0.75;
pub const UNRELATED: f64 = 1.0;

/// Distance when the sign types agree but the passive handshapes differ.
pub const OTHER_PASSIVE_SHAPE: f64 = 0.5;

/// Placement distance used whenever it cannot be computed.
pub const NO_PLACEMENT: f64 = 1.0;

/// Similarity ladder for the active hand.
///
/// The rungs are checked in order and the first match wins. An empty shape
/// set on either side is never similar to anything, including another
/// empty set. Group sets are compared with plain set equality.
pub fn active_shape_distance<S: Ord, G: Ord>(
    user_shapes: &BTreeSet<S>,
    user_groups: &BTreeSet<G>,
    db_shapes: &BTreeSet<S>,
    db_groups: &BTreeSet<G>,
) -> f64 {
    if user_shapes.is_empty() || db_shapes.is_empty() {
        return UNRELATED;
    }
    if user_shapes == db_shapes {
        return SAME_SHAPES;
    }
    let same_groups = user_groups == db_groups;
    if same_groups && !user_shapes.is_disjoint(db_shapes) {
        SHARED_SHAPE_SAME_GROUPS
    } else if same_groups {
        SAME_GROUPS
    } else if !user_groups.is_disjoint(db_groups) {
        SHARED_GROUP
    } else {
        UNRELATED
    }
}

pub fn sign_type_distance(
    user_type: SignType,
    user_passive: Option<HandshapeId>,
    db_type: SignType,
    db_passive: Option<HandshapeId>,
) -> f64 {
    if user_type != db_type {
        1.0
    } else if user_type == SignType::PassiveHand && user_passive != db_passive {
        OTHER_PASSIVE_SHAPE
    } else {
        0.0
    }
}

/// `1 - 2·overlap / (user_area + db_area)`; two empty rasters are maximally distant.
pub fn placement_distance(user: &Raster, user_area: u32, db: &Raster, db_area: u32) -> f64 {
    let total = u64::from(user_area) + u64::from(db_area);
    if total == 0 {
        return NO_PLACEMENT;
    }
    let overlap = u64::from(user.overlap(db));
    1.0 - (2 * overlap) as f64 / total as f64
}

/// The three distance dimensions of one reference sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignDistance {
    pub active: f64,
    pub sign_type: f64,
    pub placement: f64,
}

impl SignDistance {
    pub fn total(&self) -> f64 {
        self.active + self.sign_type + self.placement
    }
}
