//! Sign descriptions: the user's query sketch and catalogued reference signs.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{Ellipse, RasterError};
use crate::taxonomy::{HandshapeId, TaxonomyError};

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("unknown sign type {0:?} (expected 'single hand', 'both the same' or 'passive hand')")]
    UnknownSignType(String),

    #[error("at most 2 active handshapes can be given, got {0}")]
    TooManyShapes(usize),

    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),

    #[error(transparent)]
    Placement(#[from] RasterError),
}

/// How the hands are used in a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignType {
    #[default]
    #[serde(rename = "single hand")]
    SingleHand,
    #[serde(rename = "both the same")]
    BothSameShape,
    #[serde(rename = "passive hand")]
    PassiveHand,
}

impl SignType {
    pub const ALL: [SignType; 3] = [
        SignType::SingleHand,
        SignType::BothSameShape,
        SignType::PassiveHand,
    ];

    /// Label as stored in the catalogue.
    pub fn as_str(self) -> &'static str {
        match self {
            SignType::SingleHand => "single hand",
            SignType::BothSameShape => "both the same",
            SignType::PassiveHand => "passive hand",
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| QueryError::UnknownSignType(s.to_string()))
    }
}

/// The sign sketched by the user. Built once per search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserSign {
    pub active_shapes: BTreeSet<HandshapeId>,
    pub sign_type: SignType,
    /// Only meaningful for `SignType::PassiveHand`.
    pub passive_shape: Option<HandshapeId>,
    pub placement: Option<Ellipse>,
}

impl UserSign {
    /// Build a query from raw selections.
    ///
    /// `shape_ids` may hold up to two ids; the "unset" sentinel 0 is dropped,
    /// as is a passive shape of 0.
    pub fn from_query(
        shape_ids: &[u8],
        sign_type: &str,
        passive_shape: Option<u8>,
        placement: Option<[f64; 5]>,
    ) -> Result<Self, QueryError> {
        if shape_ids.len() > 2 {
            return Err(QueryError::TooManyShapes(shape_ids.len()));
        }
        let mut active_shapes = BTreeSet::new();
        for &id in shape_ids {
            if let Some(shape) = HandshapeId::optional(id)? {
                active_shapes.insert(shape);
            }
        }
        let passive_shape = match passive_shape {
            Some(id) => HandshapeId::optional(id)?,
            None => None,
        };
        let placement = match placement {
            Some([cx, cy, a, b, angle]) => {
                if a < 0.0 || b < 0.0 {
                    return Err(RasterError::Parse(format!(
                        "semi-axes must be non-negative, got a={a} b={b}"
                    ))
                    .into());
                }
                Some(Ellipse::new(cx, cy, a, b, angle))
            }
            None => None,
        };
        Ok(Self {
            active_shapes,
            sign_type: sign_type.parse()?,
            passive_shape,
            placement,
        })
    }
}

/// Stored form of a reference sign's placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    Ellipse(Ellipse),
    /// Pre-rasterized `"row,zeros,ones,zeros;..."` encoding.
    RunLength(String),
}

/// One catalogued sign, read-only during search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSign {
    pub video_id: String,
    pub active_shapes: BTreeSet<HandshapeId>,
    pub sign_type: SignType,
    pub passive_shape: Option<HandshapeId>,
    pub placement: Option<Placement>,
}
