//! Roadmap SVG loader
//!
//! Pulls the root `viewBox` and the seven `semester-N` paths out of the
//! roadmap document. Everything else in the document is ignored.

use crate::core::error::AssetError;
use crate::core::geometry::{Curve, SvgCurve, ViewBox};
use crate::core::roadmap::SegmentId;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

/// Prefix of the `id` attribute carried by segment paths
pub const DEFAULT_SEGMENT_PREFIX: &str = "semester-";

/// Roadmap shipped with the binary, used when no SVG path is configured
pub const BUILTIN_ROADMAP: &str = include_str!("../assets/roadmap.svg");

/// Geometry extracted from a roadmap SVG
#[derive(Clone)]
pub struct RoadmapDocument {
    view_box: ViewBox,
    curves: BTreeMap<SegmentId, Rc<dyn Curve>>,
    rejected: Vec<SegmentId>,
    markup: String,
}

impl RoadmapDocument {
    /// Parse an SVG document held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup is not well-formed XML or the root
    /// element carries neither a `viewBox` nor numeric `width`/`height`.
    /// A segment with broken path data is logged and skipped instead.
    pub fn from_svg(markup: &str, prefix: &str) -> Result<Self, AssetError> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().trim_text(true);

        let mut view_box = None;
        let mut curves: BTreeMap<SegmentId, Rc<dyn Curve>> = BTreeMap::new();
        let mut rejected = Vec::new();

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(element) | Event::Empty(element) => {
                    let name = element.local_name();
                    match name.as_ref() {
                        b"svg" if view_box.is_none() => {
                            view_box = Some(root_view_box(&element)?);
                        }
                        b"path" => {
                            let Some(id) = segment_id(&element, prefix)? else {
                                continue;
                            };
                            if curves.contains_key(&id) || rejected.contains(&id) {
                                crate::warn!("Duplicate path for segment {id}; keeping the first");
                                continue;
                            }
                            let data = attribute(&element, "d")?.unwrap_or_default();
                            match SvgCurve::parse(&data) {
                                Ok(curve) => {
                                    crate::debug!(
                                        "Segment {id}: {} pieces, length {:.2}",
                                        curve.piece_count(),
                                        curve.total_length()
                                    );
                                    let curve: Rc<dyn Curve> = Rc::new(curve);
                                    curves.insert(id, curve);
                                }
                                Err(e) => {
                                    crate::warn!("Skipping segment {id}: {e}");
                                    rejected.push(id);
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let view_box = view_box.ok_or(AssetError::MissingViewBox)?;
        crate::info!(
            "Roadmap loaded: {} of 7 segments, viewBox {} {} {} {}",
            curves.len(),
            view_box.min_x,
            view_box.min_y,
            view_box.width,
            view_box.height
        );

        Ok(Self {
            view_box,
            curves,
            rejected,
            markup: markup.to_string(),
        })
    }

    /// Read and parse an SVG file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse.
    pub fn load(path: &Path, prefix: &str) -> Result<Self, AssetError> {
        let markup = fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_svg(&markup, prefix)
    }

    /// Parse the roadmap shipped with the binary
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded document fails to parse.
    pub fn builtin(prefix: &str) -> Result<Self, AssetError> {
        Self::from_svg(BUILTIN_ROADMAP, prefix)
    }

    /// Root coordinate system
    #[must_use]
    pub const fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Loaded curves keyed by segment
    #[must_use]
    pub const fn curves(&self) -> &BTreeMap<SegmentId, Rc<dyn Curve>> {
        &self.curves
    }

    /// Segments whose path data could not be parsed
    #[must_use]
    pub fn rejected(&self) -> &[SegmentId] {
        &self.rejected
    }

    /// Segments with no usable curve
    #[must_use]
    pub fn missing_segments(&self) -> Vec<SegmentId> {
        SegmentId::all()
            .filter(|id| !self.curves.contains_key(id))
            .collect()
    }

    /// Original SVG markup
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl std::fmt::Debug for RoadmapDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadmapDocument")
            .field("view_box", &self.view_box)
            .field("segments", &self.curves.keys().collect::<Vec<_>>())
            .field("rejected", &self.rejected)
            .finish_non_exhaustive()
    }
}

fn xml_error(e: impl std::fmt::Display) -> AssetError {
    AssetError::Xml(e.to_string())
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, AssetError> {
    match element.try_get_attribute(name).map_err(xml_error)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned())),
        None => Ok(None),
    }
}

fn segment_id(element: &BytesStart<'_>, prefix: &str) -> Result<Option<SegmentId>, AssetError> {
    let Some(id) = attribute(element, "id")? else {
        return Ok(None);
    };
    Ok(id
        .strip_prefix(prefix)
        .and_then(|n| n.parse::<u8>().ok())
        .and_then(SegmentId::new))
}

fn root_view_box(element: &BytesStart<'_>) -> Result<ViewBox, AssetError> {
    if let Some(raw) = attribute(element, "viewBox")? {
        let parsed =
            svgtypes::ViewBox::from_str(&raw).map_err(|_| AssetError::ViewBox(raw.clone()))?;
        return Ok(ViewBox::new(parsed.x, parsed.y, parsed.w, parsed.h));
    }

    let width = attribute(element, "width")?.and_then(|w| parse_length(&w));
    let height = attribute(element, "height")?.and_then(|h| parse_length(&h));
    match (width, height) {
        (Some(w), Some(h)) => {
            crate::debug!("No viewBox on root; using width/height {w}x{h}");
            Ok(ViewBox::new(0.0, 0.0, w, h))
        }
        _ => Err(AssetError::MissingViewBox),
    }
}

fn parse_length(raw: &str) -> Option<f64> {
    svgtypes::Length::from_str(raw)
        .ok()
        .map(|len| len.number)
        .filter(|n| n.is_finite() && *n > 0.0)
}
