//! Path position resolver
//!
//! Maps a progress value onto a point, heading and mirror flag on the
//! roadmap. The result is in SVG user space (origin top-left of the viewBox,
//! y growing downward), so a positive heading turns clockwise on screen.
//!
//! Only the integer part of the progress value matters: the marker sits at
//! the segment's fixed anchor fraction regardless of how far into the
//! semester the student is.

use super::segment::{clamp_progress, PathSegment, SegmentId, SegmentSet};
use crate::core::geometry::Curve;
use serde::Serialize;

/// Headings beyond this magnitude flip the marker sprite
pub const MIRROR_THRESHOLD_DEGREES: f64 = 90.0;

/// Where the marker is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedPosition {
    /// Segment the position was sampled from
    pub segment: SegmentId,
    /// Arc length sampled on that segment
    pub target_length: f64,
    /// Horizontal coordinate in SVG user units
    pub x: f64,
    /// Vertical coordinate in SVG user units (downward)
    pub y: f64,
    /// Heading of the path at the sampled point, degrees in `(-180, 180]`
    pub rotation_degrees: f64,
    /// Whether the sprite must be flipped
    pub mirror: bool,
}

/// Outcome of resolving a progress value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// The marker could be placed
    Positioned(ResolvedPosition),
    /// No curve is registered for the segment; keep the marker at its fallback spot
    Unavailable {
        /// Segment that was looked up
        segment: SegmentId,
    },
}

impl Resolution {
    /// The resolved position, if any
    #[must_use]
    pub const fn position(&self) -> Option<&ResolvedPosition> {
        match self {
            Self::Positioned(position) => Some(position),
            Self::Unavailable { .. } => None,
        }
    }

    /// Segment the progress value mapped to
    #[must_use]
    pub const fn segment(&self) -> SegmentId {
        match self {
            Self::Positioned(position) => position.segment,
            Self::Unavailable { segment } => *segment,
        }
    }

    /// Whether a position was produced
    #[must_use]
    pub const fn is_positioned(&self) -> bool {
        matches!(self, Self::Positioned(_))
    }
}

/// Resolve a progress value against a segment set.
///
/// Out-of-range progress is clamped into `[1, 7]`; a missing segment yields
/// [`Resolution::Unavailable`]. Never panics and never fails.
#[must_use]
pub fn resolve(progress: f64, segments: &SegmentSet) -> Resolution {
    let id = SegmentId::for_progress(clamp_progress(progress));
    segments.get(id).map_or(Resolution::Unavailable { segment: id }, |segment| {
        Resolution::Positioned(sample_segment(segment, segments.tangent_delta()))
    })
}

/// Sample a segment at its anchor fraction
#[must_use]
pub fn sample_segment(segment: &PathSegment, tangent_delta: f64) -> ResolvedPosition {
    let total = segment.total_length();
    let target_length = segment.target_length().clamp(0.0, total);
    let point = segment.curve().point_at_length(target_length);
    let rotation_degrees = heading_at(segment.curve(), target_length, total, tangent_delta);

    ResolvedPosition {
        segment: segment.id(),
        target_length,
        x: point.x,
        y: point.y,
        rotation_degrees,
        mirror: is_mirrored(rotation_degrees),
    }
}

/// Finite-difference heading at `length`, in degrees.
///
/// Both neighbours are clamped into `[0, total]`. A zero-length curve gives
/// identical neighbours and a heading of 0.
#[must_use]
pub fn heading_at(curve: &dyn Curve, length: f64, total: f64, delta: f64) -> f64 {
    let total = total.max(0.0);
    let before = curve.point_at_length((length - delta).clamp(0.0, total));
    let after = curve.point_at_length((length + delta).clamp(0.0, total));
    let d = after - before;
    d.y.atan2(d.x).to_degrees()
}

/// Whether a heading requires flipping the sprite; strictly beyond ±90°
#[must_use]
pub fn is_mirrored(heading_degrees: f64) -> bool {
    heading_degrees.abs() > MIRROR_THRESHOLD_DEGREES
}
