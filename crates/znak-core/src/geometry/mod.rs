//! Placement geometry: points, rotated ellipses and their rasters.
//!
//! `Ellipse` is the placement region drawn on the body canvas. `raster`
//! turns it into a fixed-size 0/1 grid so that two placements can be
//! compared by overlapping area.

pub mod raster;

pub use raster::{decode_run_length, encode_run_length, rasterize, Raster, RasterError};

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        self.sub(other).norm()
    }

    /// Rotate this point by `angle` radians around `center`.
    pub fn rotate_about(self, center: Point, angle: f64) -> Point {
        let d = self.sub(center);
        let (sin, cos) = angle.sin_cos();
        center.add(Point::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos))
    }

    /// Signed length of this vector's projection onto `direction`.
    ///
    /// Returns 0 for a zero-length direction.
    pub fn project_onto(self, direction: Point) -> f64 {
        let len = direction.norm();
        if len == 0.0 {
            return 0.0;
        }
        (self.x * direction.x + self.y * direction.y) / len
    }
}

/// Which semi-axis a scale handle controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisHandle {
    /// Along the rotated x-axis (`a`).
    Major,
    /// Along the rotated y-axis (`b`).
    Minor,
}

/// Rotated ellipse in canvas coordinates.
///
/// `a` runs along the direction `angle`, `b` perpendicular to it. A point
/// is inside when its distance from the center does not exceed
/// `sqrt(a²·cos²(phi − angle) + b²·sin²(phi − angle))`, `phi` being the
/// point's bearing from the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point,
    pub a: f64,
    pub b: f64,
    pub angle: f64,
}

impl Ellipse {
    pub fn new(center_x: f64, center_y: f64, a: f64, b: f64, angle: f64) -> Self {
        Self {
            center: Point::new(center_x, center_y),
            a,
            b,
            angle,
        }
    }

    /// Axis-aligned ellipse inscribed in the box spanned by two drag corners.
    ///
    /// Coordinates are halved with flooring, as the drawing canvas works on
    /// whole pixels.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let center_x = ((p1.x + p2.x) / 2.0).floor();
        let center_y = ((p1.y + p2.y) / 2.0).floor();
        let a = ((p1.x - p2.x).abs() / 2.0).floor();
        let b = ((p1.y - p2.y).abs() / 2.0).floor();
        Self::new(center_x, center_y, a, b, 0.0)
    }

    /// An ellipse with a zero (or invalid) axis encloses no area.
    pub fn is_degenerate(&self) -> bool {
        !(self.a > 0.0 && self.b > 0.0 && self.a.is_finite() && self.b.is_finite())
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            center: self.center.add(Point::new(dx, dy)),
            ..*self
        }
    }

    /// Rotate by `delta` radians; the resulting angle is kept in `[0, 2π)`.
    pub fn rotated(&self, delta: f64) -> Self {
        Self {
            angle: (self.angle + delta).rem_euclid(TAU),
            ..*self
        }
    }

    /// Rescale one semi-axis so that it reaches the dragged `handle` point.
    pub fn with_axis_handle(&self, handle: Point, axis: AxisHandle) -> Self {
        let (sin, cos) = self.angle.sin_cos();
        let offset = handle.sub(self.center);
        match axis {
            AxisHandle::Major => Self {
                a: offset.project_onto(Point::new(cos, sin)).abs(),
                ..*self
            },
            AxisHandle::Minor => Self {
                b: offset.project_onto(Point::new(-sin, cos)).abs(),
                ..*self
            },
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        !self.is_degenerate() && self.encloses(p.x - self.center.x, p.y - self.center.y)
    }

    /// Membership test for an offset from the center. Assumes non-degenerate axes.
    pub(crate) fn encloses(&self, dx: f64, dy: f64) -> bool {
        let r2 = dx * dx + dy * dy;
        let t = dy.atan2(dx) - self.angle;
        let (sin, cos) = t.sin_cos();
        r2 <= self.a * self.a * cos * cos + self.b * self.b * sin * sin
    }

    /// Outline polygon with `steps` vertices, for previews.
    pub fn outline(&self, steps: usize) -> Vec<Point> {
        (0..steps)
            .map(|i| {
                let theta = TAU * i as f64 / steps as f64;
                let p = Point::new(
                    self.center.x + self.a * theta.cos(),
                    self.center.y + self.b * theta.sin(),
                );
                p.rotate_about(self.center, self.angle)
            })
            .collect()
    }
}

impl fmt::Display for Ellipse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.center.x, self.center.y, self.a, self.b, self.angle
        )
    }
}

/// Parses `"center_x,center_y,a,b,angle"`.
impl FromStr for Ellipse {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| RasterError::Parse(format!("ellipse {s:?}: {e}")))?;
        match values.as_slice() {
            &[cx, cy, a, b, angle] => {
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(RasterError::Parse(format!("ellipse {s:?}: non-finite value")));
                }
                if a < 0.0 || b < 0.0 {
                    return Err(RasterError::Parse(format!(
                        "ellipse {s:?}: semi-axes must be non-negative"
                    )));
                }
                Ok(Ellipse::new(cx, cy, a, b, angle))
            }
            _ => Err(RasterError::Parse(format!(
                "ellipse {s:?}: expected 5 values, got {}",
                values.len()
            ))),
        }
    }
}
