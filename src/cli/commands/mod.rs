//! CLI command handlers for `roadmap`.
//!
//! Each command is implemented in its own submodule; the helpers here load
//! the roadmap and status texts the way every command needs them.

pub mod config;
pub mod preview;
pub mod resolve;
pub mod student;

use semester_roadmap::config::Config;
use semester_roadmap::core::geometry::ViewBox;
use semester_roadmap::core::loader::DEFAULT_SEGMENT_PREFIX;
use semester_roadmap::core::progress::StudentSnapshot;
use semester_roadmap::core::status::StatusTexts;
use semester_roadmap::error;
use semester_roadmap::{RoadmapDocument, RoadmapSession};
use std::fs;
use std::path::{Path, PathBuf};

/// Load the configured roadmap, or the built-in one when no SVG is configured.
///
/// Returns `None` (after logging) when the document cannot be loaded.
pub fn load_document(config: &Config) -> Option<RoadmapDocument> {
    let prefix = if config.roadmap.segment_prefix.is_empty() {
        DEFAULT_SEGMENT_PREFIX
    } else {
        config.roadmap.segment_prefix.as_str()
    };

    let result = if config.paths.svg.is_empty() {
        RoadmapDocument::builtin(prefix)
    } else {
        RoadmapDocument::load(&PathBuf::from(&config.paths.svg), prefix)
    };

    match result {
        Ok(document) => Some(document),
        Err(e) => {
            error!("Roadmap unavailable: {e}");
            eprintln!("✗ Failed to load roadmap: {e}");
            None
        }
    }
}

/// Build a session from the configured roadmap.
///
/// A roadmap that fails to load yields an empty session, so every lookup
/// reports the segment as unavailable.
pub fn load_session(config: &Config) -> (Option<RoadmapDocument>, RoadmapSession) {
    let document = load_document(config);
    let session = document.as_ref().map_or_else(
        || RoadmapSession::empty(ViewBox::default()),
        |doc| RoadmapSession::new(doc, &config.anchors, config.roadmap.tangent_delta),
    );
    (document, session)
}

/// Status texts from the configured file, or the built-in table
pub fn load_texts(config: &Config) -> StatusTexts {
    if config.paths.texts.is_empty() {
        StatusTexts::builtin()
    } else {
        StatusTexts::load_or_builtin(Path::new(&config.paths.texts))
    }
}

/// Read a student snapshot from a JSON file
///
/// # Errors
/// Returns a printable message if the file cannot be read or parsed.
pub fn read_student(path: &Path) -> Result<StudentSnapshot, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("✗ Failed to read student file {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("✗ Invalid student file {}: {e}", path.display()))
}
