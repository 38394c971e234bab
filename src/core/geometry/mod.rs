//! Planar geometry used by the roadmap resolver.
//!
//! All coordinates live in SVG user space: origin at the top-left of the
//! document's viewBox, x growing rightward, y growing downward.

pub mod svg_path;

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

pub use svg_path::SvgCurve;

/// A point (or displacement) in SVG user units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing rightward
    pub x: f64,
    /// Vertical coordinate, growing downward
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when read as a vector
    #[must_use]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).norm()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Point> for f64 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        rhs * self
    }
}

/// A curve that can be sampled by arc length.
///
/// Implementations must accept any `length` and clamp it to
/// `[0, total_length()]` themselves.
pub trait Curve {
    /// Total arc length of the curve
    fn total_length(&self) -> f64;

    /// Point reached after travelling `length` units from the curve start
    fn point_at_length(&self, length: f64) -> Point;
}

/// Axis-aligned viewport of an SVG document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    /// Left edge in user units
    pub min_x: f64,
    /// Top edge in user units
    pub min_y: f64,
    /// Width in user units
    pub width: f64,
    /// Height in user units
    pub height: f64,
}

impl ViewBox {
    /// Create a viewBox
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Position of `point` as fractions of the box (0.0 at the top-left, 1.0 at the bottom-right).
    ///
    /// Degenerate axes map to 0.0.
    #[must_use]
    pub fn normalize(&self, point: Point) -> Point {
        let fx = if self.width > 0.0 {
            (point.x - self.min_x) / self.width
        } else {
            0.0
        };
        let fy = if self.height > 0.0 {
            (point.y - self.min_y) / self.height
        } else {
            0.0
        };
        Point::new(fx, fy)
    }
}

impl Default for ViewBox {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }
}
