//! Mapping from roadmap user space into an on-screen percentage box

use super::anchors::ViewContext;
use super::resolver::ResolvedPosition;
use crate::core::geometry::{Point, ViewBox};
use serde::{Deserialize, Serialize};

/// Where the roadmap image sits inside its container, in percent of the container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBox {
    /// Left edge, percent of container width
    #[serde(default)]
    pub left: f64,
    /// Top edge, percent of container height
    #[serde(default)]
    pub top: f64,
    /// Width, percent of container width
    #[serde(default = "full_extent")]
    pub width: f64,
    /// Height, percent of container height
    #[serde(default = "full_extent")]
    pub height: f64,
    /// Marker position used when no segment could be resolved (left %)
    #[serde(default = "fallback_left")]
    pub fallback_left: f64,
    /// Marker position used when no segment could be resolved (top %)
    #[serde(default = "fallback_top")]
    pub fallback_top: f64,
}

const fn full_extent() -> f64 {
    100.0
}

const fn fallback_left() -> f64 {
    8.0
}

const fn fallback_top() -> f64 {
    85.0
}

impl Default for ViewportBox {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: full_extent(),
            height: full_extent(),
            fallback_left: fallback_left(),
            fallback_top: fallback_top(),
        }
    }
}

impl ViewportBox {
    /// Map a user-space point into container percentages
    #[must_use]
    pub fn map_point(&self, view_box: &ViewBox, point: Point) -> Point {
        let n = view_box.normalize(point);
        Point::new(
            n.x.mul_add(self.width, self.left),
            n.y.mul_add(self.height, self.top),
        )
    }

    /// Placement for a resolved position
    #[must_use]
    pub fn place(&self, view_box: &ViewBox, position: &ResolvedPosition) -> MarkerPlacement {
        let mapped = self.map_point(view_box, Point::new(position.x, position.y));
        MarkerPlacement {
            left_percent: mapped.x,
            top_percent: mapped.y,
            rotation_degrees: position.rotation_degrees,
            mirror: position.mirror,
            fallback: false,
        }
    }

    /// Inline style placing the roadmap image at this box inside the container
    #[must_use]
    pub fn frame_css(&self) -> String {
        format!(
            "left: {:.3}%; top: {:.3}%; width: {:.3}%; height: {:.3}%;",
            self.left, self.top, self.width, self.height
        )
    }

    /// Width-to-height ratio the container needs so that this box has the
    /// proportions of `view_box`
    #[must_use]
    pub fn container_aspect(&self, view_box: &ViewBox) -> f64 {
        let ratio = (view_box.width * self.height) / (view_box.height * self.width);
        if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }

    /// Static placement used when the position is unavailable
    #[must_use]
    pub const fn fallback(&self) -> MarkerPlacement {
        MarkerPlacement {
            left_percent: self.fallback_left,
            top_percent: self.fallback_top,
            rotation_degrees: 0.0,
            mirror: false,
            fallback: true,
        }
    }
}

/// Viewport boxes for every view context
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Full-size roadmap
    #[serde(default)]
    pub full: ViewportBox,
    /// Popup miniature
    #[serde(default)]
    pub popup: ViewportBox,
}

impl ViewportConfig {
    /// Box for a context
    #[must_use]
    pub const fn for_context(&self, context: ViewContext) -> &ViewportBox {
        match context {
            ViewContext::Full => &self.full,
            ViewContext::Popup => &self.popup,
        }
    }
}

/// Final marker placement handed to the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerPlacement {
    /// `left` in percent of the container
    pub left_percent: f64,
    /// `top` in percent of the container
    pub top_percent: f64,
    /// Rotation in degrees, clockwise on screen
    pub rotation_degrees: f64,
    /// Flip vertically after rotating
    pub mirror: bool,
    /// Whether this is the static fallback spot
    pub fallback: bool,
}

impl MarkerPlacement {
    /// CSS `transform` centring the sprite on the point, then rotating and optionally flipping it
    #[must_use]
    pub fn transform_css(&self) -> String {
        let flip = if self.mirror { " scaleY(-1)" } else { "" };
        format!(
            "translate(-50%, -50%) rotate({:.2}deg){flip}",
            self.rotation_degrees
        )
    }

    /// Complete inline style for an absolutely positioned marker
    #[must_use]
    pub fn style_css(&self) -> String {
        format!(
            "left: {:.3}%; top: {:.3}%; transform: {};",
            self.left_percent,
            self.top_percent,
            self.transform_css()
        )
    }
}
