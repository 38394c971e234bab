//! Errors raised while loading roadmap assets

use std::path::PathBuf;

/// Failure to turn a roadmap asset into usable geometry.
///
/// Resolving a position never produces one of these; only loading does.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The asset file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The SVG document is not well-formed XML
    #[error("malformed SVG document: {0}")]
    Xml(String),
    /// A `d` attribute could not be parsed as SVG path data
    #[error("invalid path data: {0}")]
    PathData(String),
    /// The root `viewBox` attribute could not be parsed
    #[error("invalid viewBox '{0}'")]
    ViewBox(String),
    /// Neither `viewBox` nor numeric `width`/`height` were present on the root element
    #[error("SVG document has no viewBox and no usable width/height")]
    MissingViewBox,
}
