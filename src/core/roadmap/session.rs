//! Per-render roadmap state
//!
//! A [`RoadmapSession`] is built once from a loaded document and handed to
//! whoever needs positions. It owns the viewBox and one segment set per
//! view context, so nothing about the roadmap lives in globals.

use super::anchors::{AnchorTables, ViewContext};
use super::resolver::{resolve, Resolution};
use super::segment::{SegmentSet, DEFAULT_TANGENT_DELTA};
use super::viewport::{MarkerPlacement, ViewportBox};
use crate::core::geometry::ViewBox;
use crate::core::loader::RoadmapDocument;

/// Immutable lookup context for one roadmap
#[derive(Debug, Clone)]
pub struct RoadmapSession {
    view_box: ViewBox,
    full: SegmentSet,
    popup: SegmentSet,
}

impl RoadmapSession {
    /// Register the document's curves under both view contexts
    #[must_use]
    pub fn new(document: &RoadmapDocument, anchors: &AnchorTables, tangent_delta: f64) -> Self {
        let build = |context: ViewContext| {
            SegmentSet::from_curves(
                document.curves().iter().map(|(id, curve)| (*id, curve)),
                anchors.for_context(context),
                tangent_delta,
            )
        };
        let session = Self {
            view_box: document.view_box(),
            full: build(ViewContext::Full),
            popup: build(ViewContext::Popup),
        };

        let missing = session.full.missing();
        if !missing.is_empty() {
            let ids: Vec<String> = missing.iter().map(ToString::to_string).collect();
            crate::warn!("Roadmap has no curve for segment(s) {}", ids.join(", "));
        }
        session
    }

    /// Session without any curves; every lookup is unavailable
    #[must_use]
    pub fn empty(view_box: ViewBox) -> Self {
        Self {
            view_box,
            full: SegmentSet::with_tangent_delta(DEFAULT_TANGENT_DELTA),
            popup: SegmentSet::with_tangent_delta(DEFAULT_TANGENT_DELTA),
        }
    }

    /// Root coordinate system
    #[must_use]
    pub const fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Segment set for a context
    #[must_use]
    pub const fn segments(&self, context: ViewContext) -> &SegmentSet {
        match context {
            ViewContext::Full => &self.full,
            ViewContext::Popup => &self.popup,
        }
    }

    /// Resolve progress in a context
    #[must_use]
    pub fn resolve(&self, context: ViewContext, progress: f64) -> Resolution {
        let resolution = resolve(progress, self.segments(context));
        match &resolution {
            Resolution::Positioned(pos) => crate::debug!(
                "[{context}] progress {progress} -> segment {} at ({:.2}, {:.2}) {:.2}deg{}",
                pos.segment,
                pos.x,
                pos.y,
                pos.rotation_degrees,
                if pos.mirror { " mirrored" } else { "" }
            ),
            Resolution::Unavailable { segment } => crate::warn!(
                "[{context}] segment {segment} unavailable; marker stays at its fallback position"
            ),
        }
        resolution
    }

    /// Resolve progress and map the result into an on-screen box
    #[must_use]
    pub fn place(
        &self,
        context: ViewContext,
        progress: f64,
        viewport: &ViewportBox,
    ) -> MarkerPlacement {
        match self.resolve(context, progress) {
            Resolution::Positioned(pos) => viewport.place(&self.view_box, &pos),
            Resolution::Unavailable { .. } => viewport.fallback(),
        }
    }
}
