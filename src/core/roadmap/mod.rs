//! Semester roadmap: segments, anchors and the position resolver

pub mod anchors;
pub mod resolver;
pub mod segment;
pub mod session;
pub mod viewport;

pub use anchors::{AnchorTable, AnchorTables, ViewContext};
pub use resolver::{heading_at, is_mirrored, resolve, Resolution, ResolvedPosition};
pub use segment::{clamp_progress, PathSegment, SegmentId, SegmentSet};
pub use session::RoadmapSession;
pub use viewport::{MarkerPlacement, ViewportBox, ViewportConfig};
