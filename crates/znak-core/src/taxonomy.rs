//! Handshape ids and their visual-similarity groups.
//!
//! The grouping is hand-curated reference data. Every handshape belongs to
//! exactly one group; the group label is what `distance::active_shape_distance`
//! compares when two shapes are "similar but not identical".

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest valid handshape id.
pub const SHAPE_COUNT: u8 = 54;

/// Group label for handshape `i + 1`.
///
/// The four base shapes 1-4 each head their own group.
static SHAPE_GROUPS: [&str; SHAPE_COUNT as usize] = [
    // 1-4: flat hand, spread hand, fist, index finger
    "I", "II", "III", "IV",
    // 5-6: flat hand variants
    "I", "I",
    // 7-8: spread hand variants
    "II", "II",
    // 9-11: fist variants
    "III", "III", "III",
    // 12-14: index finger variants
    "IV", "IV", "IV",
    // 15-18: two fingers
    "V", "V", "V", "V",
    // 19-21: claw
    "VI", "VI", "VI",
    // 22-25: round
    "VII", "VII", "VII", "VII",
    // 26-28: pinch
    "VIII", "VIII", "VIII",
    // 29-31: little finger
    "IX", "IX", "IX",
    // 32-35: thumb
    "X", "X", "X", "X",
    // 36-38: three fingers
    "XI", "XI", "XI",
    // 39-42: hooked fingers
    "XII", "XII", "XII", "XII",
    // 43-47: crossed fingers
    "XIII", "XIII", "XIII", "XIII", "XIII",
    // 48-51: bent hand
    "XIV", "XIV", "XIV", "XIV",
    // 52-54: other
    "XV", "XV", "XV",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    #[error("unknown handshape id {0} (expected 1..={SHAPE_COUNT})")]
    UnknownHandshape(u8),
}

/// A handshape id in `1..=54`. The sentinel 0 ("no shape") is not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HandshapeId(u8);

impl HandshapeId {
    pub fn new(id: u8) -> Result<Self, TaxonomyError> {
        if (1..=SHAPE_COUNT).contains(&id) {
            Ok(Self(id))
        } else {
            Err(TaxonomyError::UnknownHandshape(id))
        }
    }

    /// Like `new`, but maps the "unset" sentinel 0 to `None`.
    pub fn optional(id: u8) -> Result<Option<Self>, TaxonomyError> {
        if id == 0 {
            Ok(None)
        } else {
            Self::new(id).map(Some)
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn group(self) -> ShapeGroup {
        ShapeGroup(SHAPE_GROUPS[usize::from(self.0 - 1)])
    }

    /// All valid handshape ids in ascending order.
    pub fn all() -> impl Iterator<Item = HandshapeId> {
        (1..=SHAPE_COUNT).map(HandshapeId)
    }
}

impl TryFrom<u8> for HandshapeId {
    type Error = TaxonomyError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<HandshapeId> for u8 {
    fn from(id: HandshapeId) -> u8 {
        id.0
    }
}

impl fmt::Display for HandshapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Group label such as `"IV"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeGroup(&'static str);

impl ShapeGroup {
    pub fn label(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ShapeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Group of a raw id. Ids outside `1..=54` are rejected.
pub fn group_of(id: u8) -> Result<ShapeGroup, TaxonomyError> {
    HandshapeId::new(id).map(HandshapeId::group)
}

/// Map a shape set to the set of groups its members belong to.
pub fn groups_of(shapes: &BTreeSet<HandshapeId>) -> BTreeSet<ShapeGroup> {
    shapes.iter().map(|s| s.group()).collect()
}
