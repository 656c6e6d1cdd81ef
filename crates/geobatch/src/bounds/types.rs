//! Axis-aligned 2D bounding box.
//!
//! - Empty when the X or Y interval is empty (`min > max`). `empty()` is
//!   `(+inf, +inf, -inf, -inf)`, the identity for `merge`/`widen`.
//! - Degenerate (a point) when both intervals have zero length.
//! - Any NaN bound makes the box empty; NaN ordinates never widen a box.

use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    #[inline]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Box spanned by two corners, in any order.
    pub fn from_corners(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    #[inline]
    pub fn min(&self) -> Vector2<f64> {
        Vector2::new(self.min_x, self.min_y)
    }

    #[inline]
    pub fn max(&self) -> Vector2<f64> {
        Vector2::new(self.max_x, self.max_y)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.min_x <= self.max_x && self.min_y <= self.max_y)
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.min_x == self.max_x && self.min_y == self.max_y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True if `other` lies inside `self` (boundary included).
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    /// Closed-interval overlap on both axes; never true for an empty box.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.is_empty()
            || other.is_empty()
            || other.min_x > self.max_x
            || other.min_y > self.max_y
            || other.max_x < self.min_x
            || other.max_y < self.min_y)
    }

    /// Smallest box covering both.
    pub fn merge(&self, other: &BoundingBox) -> BoundingBox {
        if other.is_empty() {
            return *self;
        }
        let mut out = *self;
        out.widen_x(other.min_x);
        out.widen_x(other.max_x);
        out.widen_y(other.min_y);
        out.widen_y(other.max_y);
        out
    }

    #[inline]
    pub(crate) fn widen(&mut self, x: f64, y: f64) {
        self.widen_x(x);
        self.widen_y(y);
    }

    // `f64::min` ignores a NaN argument.
    #[inline]
    pub(crate) fn widen_x(&mut self, x: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
    }

    #[inline]
    pub(crate) fn widen_y(&mut self, y: f64) {
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6} {:.6} {:.6} {:.6}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
