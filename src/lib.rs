//! Semester roadmap library
//!
//! Places a student's progress marker on an SVG roadmap: which segment, where
//! on it, which way the road is heading and whether the sprite must be
//! flipped. Also derives the progress value and status texts from a
//! student's module record.

pub mod core;
pub mod logger;

pub use crate::core::config;
pub use crate::core::error::AssetError;
pub use crate::core::get_version;
pub use crate::core::loader::RoadmapDocument;
pub use crate::core::roadmap::{resolve, Resolution, RoadmapSession, ViewContext};
