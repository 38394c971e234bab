//! Roadmap segments: one sampled curve per semester transition

use super::anchors::AnchorTable;
use crate::core::geometry::Curve;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Number of segments on the roadmap (semesters 1 through 7)
pub const SEGMENT_COUNT: usize = 7;

/// Lowest accepted progress value
pub const MIN_PROGRESS: f64 = 1.0;

/// Highest accepted progress value
pub const MAX_PROGRESS: f64 = 7.0;

/// Default finite-difference step used to estimate the heading, in path units
pub const DEFAULT_TANGENT_DELTA: f64 = 0.5;

/// Clamp a progress value into `[MIN_PROGRESS, MAX_PROGRESS]`.
///
/// NaN is treated as the start of the roadmap.
#[must_use]
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        MIN_PROGRESS
    } else {
        value.clamp(MIN_PROGRESS, MAX_PROGRESS)
    }
}

/// Identifier of a roadmap segment; always within `1..=7`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SegmentId(u8);

impl SegmentId {
    /// Create an id, rejecting anything outside `1..=7`
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if id >= 1 && id as usize <= SEGMENT_COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Segment a progress value falls on: `clamp(floor(value), 1, 7)`
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn for_progress(value: f64) -> Self {
        // clamped into [1, 7], so the cast is exact
        Self(clamp_progress(value).floor() as u8)
    }

    /// All segment ids in order
    #[allow(clippy::cast_possible_truncation)]
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=SEGMENT_COUNT as u8).map(Self)
    }

    /// Numeric id
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position in per-segment tables
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One navigable curve between milestone `id` and the next one
#[derive(Clone)]
pub struct PathSegment {
    id: SegmentId,
    curve: Rc<dyn Curve>,
    total_length: f64,
    anchor_fraction: f64,
}

impl PathSegment {
    /// Wrap a curve; its total length is measured once here
    #[must_use]
    pub fn new(id: SegmentId, curve: Rc<dyn Curve>, anchor_fraction: f64) -> Self {
        let measured = curve.total_length();
        let total_length = if measured.is_finite() {
            measured.max(0.0)
        } else {
            0.0
        };
        let anchor_fraction = if anchor_fraction.is_nan() {
            0.0
        } else {
            anchor_fraction.clamp(0.0, 1.0)
        };
        Self {
            id,
            curve,
            total_length,
            anchor_fraction,
        }
    }

    /// Segment id
    #[must_use]
    pub const fn id(&self) -> SegmentId {
        self.id
    }

    /// Arc length measured at construction
    #[must_use]
    pub const fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Fixed fraction of the arc length where the marker sits
    #[must_use]
    pub const fn anchor_fraction(&self) -> f64 {
        self.anchor_fraction
    }

    /// Arc length the marker is drawn at
    #[must_use]
    pub fn target_length(&self) -> f64 {
        self.anchor_fraction * self.total_length
    }

    /// Underlying curve
    #[must_use]
    pub fn curve(&self) -> &dyn Curve {
        self.curve.as_ref()
    }
}

impl fmt::Debug for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathSegment")
            .field("id", &self.id)
            .field("total_length", &self.total_length)
            .field("anchor_fraction", &self.anchor_fraction)
            .finish_non_exhaustive()
    }
}

/// The immutable set of segments for one rendering of the roadmap
#[derive(Debug, Clone)]
pub struct SegmentSet {
    segments: BTreeMap<SegmentId, PathSegment>,
    tangent_delta: f64,
}

impl SegmentSet {
    /// Empty set using the default tangent step
    #[must_use]
    pub fn new() -> Self {
        Self::with_tangent_delta(DEFAULT_TANGENT_DELTA)
    }

    /// Empty set with a custom tangent step; non-positive or non-finite steps fall back to the default
    #[must_use]
    pub fn with_tangent_delta(delta: f64) -> Self {
        let tangent_delta = if delta.is_finite() && delta > 0.0 {
            delta
        } else {
            DEFAULT_TANGENT_DELTA
        };
        Self {
            segments: BTreeMap::new(),
            tangent_delta,
        }
    }

    /// Build a set from loaded curves, taking each segment's anchor from `anchors`
    #[must_use]
    pub fn from_curves<'a, I>(curves: I, anchors: &AnchorTable, tangent_delta: f64) -> Self
    where
        I: IntoIterator<Item = (SegmentId, &'a Rc<dyn Curve>)>,
    {
        let mut set = Self::with_tangent_delta(tangent_delta);
        for (id, curve) in curves {
            set.insert(PathSegment::new(id, Rc::clone(curve), anchors.fraction(id)));
        }
        set
    }

    /// Register a segment, replacing any previous one with the same id
    pub fn insert(&mut self, segment: PathSegment) {
        self.segments.insert(segment.id(), segment);
    }

    /// Segment with the given id, if registered
    #[must_use]
    pub fn get(&self, id: SegmentId) -> Option<&PathSegment> {
        self.segments.get(&id)
    }

    /// Step used for the finite-difference heading estimate
    #[must_use]
    pub const fn tangent_delta(&self) -> f64 {
        self.tangent_delta
    }

    /// Registered ids in order
    pub fn ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.segments.keys().copied()
    }

    /// Ids in `1..=7` with no registered segment
    #[must_use]
    pub fn missing(&self) -> Vec<SegmentId> {
        SegmentId::all()
            .filter(|id| !self.segments.contains_key(id))
            .collect()
    }

    /// Number of registered segments
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segment is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Default for SegmentSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Point;

    struct Flat(f64);

    impl Curve for Flat {
        fn total_length(&self) -> f64 {
            self.0
        }

        fn point_at_length(&self, length: f64) -> Point {
            Point::new(length.clamp(0.0, self.0), 0.0)
        }
    }

    #[test]
    fn test_segment_id_bounds() {
        assert!(SegmentId::new(0).is_none());
        assert!(SegmentId::new(8).is_none());
        assert_eq!(SegmentId::new(7).map(SegmentId::get), Some(7));
        assert_eq!(SegmentId::all().count(), SEGMENT_COUNT);
    }

    #[test]
    fn test_for_progress_floors_and_clamps() {
        assert_eq!(SegmentId::for_progress(1.0).get(), 1);
        assert_eq!(SegmentId::for_progress(3.99).get(), 3);
        assert_eq!(SegmentId::for_progress(7.0).get(), 7);
        assert_eq!(SegmentId::for_progress(7.9).get(), 7);
        assert_eq!(SegmentId::for_progress(42.0).get(), 7);
        assert_eq!(SegmentId::for_progress(0.2).get(), 1);
        assert_eq!(SegmentId::for_progress(-3.0).get(), 1);
        assert_eq!(SegmentId::for_progress(f64::NAN).get(), 1);
        assert_eq!(SegmentId::for_progress(f64::INFINITY).get(), 7);
    }

    #[test]
    fn test_path_segment_target_length() {
        let seg = PathSegment::new(SegmentId::new(1).unwrap(), Rc::new(Flat(200.0)), 0.5);
        assert!((seg.total_length() - 200.0).abs() < f64::EPSILON);
        assert!((seg.target_length() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_path_segment_sanitizes_inputs() {
        let seg = PathSegment::new(SegmentId::new(2).unwrap(), Rc::new(Flat(f64::NAN)), 1.7);
        assert!(seg.total_length().abs() < f64::EPSILON);
        assert!((seg.anchor_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_segment_set_missing() {
        let mut set = SegmentSet::new();
        set.insert(PathSegment::new(SegmentId::new(2).unwrap(), Rc::new(Flat(5.0)), 0.1));
        let missing: Vec<u8> = set.missing().into_iter().map(SegmentId::get).collect();
        assert_eq!(missing, vec![1, 3, 4, 5, 6, 7]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_invalid_tangent_delta_falls_back() {
        assert!((SegmentSet::with_tangent_delta(-1.0).tangent_delta() - 0.5).abs() < f64::EPSILON);
        assert!((SegmentSet::with_tangent_delta(2.0).tangent_delta() - 2.0).abs() < f64::EPSILON);
    }
}
