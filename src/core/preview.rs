//! HTML preview of a resolved marker on the roadmap

use crate::core::loader::RoadmapDocument;
use crate::core::roadmap::{MarkerPlacement, SegmentId, ViewContext, ViewportBox};
use crate::core::status::{Language, StatusLines};
use askama::Template;
use std::fs;
use std::path::Path;

/// Page rendered by `templates/preview.html`
#[derive(Template)]
#[template(path = "preview.html")]
pub struct PreviewPage<'a> {
    /// Page heading
    pub title: String,
    /// `lang` attribute of the page
    pub language: Language,
    /// Inline SVG markup of the roadmap
    pub svg: &'a str,
    /// Share of the page width taken by the roadmap
    pub width_percent: u8,
    /// Progress value that was resolved
    pub progress: f64,
    /// Segment the progress value fell on
    pub segment: SegmentId,
    /// View the marker was placed for
    pub context: ViewContext,
    /// Box the roadmap image occupies; the marker is placed against the same box
    pub viewport: ViewportBox,
    /// Width-to-height ratio of the container
    pub aspect_ratio: f64,
    /// Marker placement
    pub placement: MarkerPlacement,
    /// Status lines, when a student record was given
    pub lines: Option<StatusLines>,
}

impl<'a> PreviewPage<'a> {
    /// Page for `document` drawn into `viewport`, with the marker at `placement`
    ///
    /// `placement` must have been computed with the same `viewport`.
    #[must_use]
    pub fn new(
        document: &'a RoadmapDocument,
        context: ViewContext,
        progress: f64,
        segment: SegmentId,
        viewport: ViewportBox,
        placement: MarkerPlacement,
    ) -> Self {
        Self {
            title: format!("Semester roadmap: semester {segment}"),
            language: Language::default(),
            svg: document.markup(),
            width_percent: match context {
                ViewContext::Full => 100,
                ViewContext::Popup => 40,
            },
            progress,
            segment,
            context,
            viewport,
            aspect_ratio: viewport.container_aspect(&document.view_box()),
            placement,
            lines: None,
        }
    }

    /// Attach status lines and set the page language
    #[must_use]
    pub fn with_status(mut self, lines: StatusLines, language: Language) -> Self {
        self.lines = Some(lines);
        self.language = language;
        self
    }

    /// Replace the page heading
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render and write the page
    ///
    /// # Errors
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn write_to(&self, output_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let html = self.render()?;
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, html)?;
        crate::info!("Preview written to {}", output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::DEFAULT_SEGMENT_PREFIX;
    use crate::core::roadmap::{AnchorTable, AnchorTables, RoadmapSession};

    #[test]
    fn test_render_contains_svg_and_marker() {
        let doc = RoadmapDocument::builtin(DEFAULT_SEGMENT_PREFIX).unwrap();
        let session = RoadmapSession::new(&doc, &AnchorTables::default(), 0.5);
        let viewport = ViewportBox::default();
        let placement = session.place(ViewContext::Full, 4.2, &viewport);
        let html = PreviewPage::new(
            &doc,
            ViewContext::Full,
            4.2,
            SegmentId::new(4).unwrap(),
            viewport,
            placement,
        )
        .render()
        .unwrap();
        assert!(html.contains("id=\"semester-4\""));
        assert!(html.contains(&placement.transform_css()));
        assert!(html.contains("<dd>4</dd>"));
    }

    #[test]
    fn test_render_with_status_lines() {
        let doc = RoadmapDocument::builtin(DEFAULT_SEGMENT_PREFIX).unwrap();
        let lines = StatusLines {
            grade: "grade line".to_string(),
            time: "time line".to_string(),
            fee: "fee line".to_string(),
        };
        let html = PreviewPage::new(
            &doc,
            ViewContext::Popup,
            1.0,
            SegmentId::new(1).unwrap(),
            ViewportBox::default(),
            ViewportBox::default().fallback(),
        )
        .with_status(lines, Language::En)
        .render()
        .unwrap();
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("<li>fee line</li>"));
        assert!(html.contains("marker fallback"));
    }

    #[test]
    fn test_popup_image_and_marker_share_the_viewport_box() {
        let svg = r#"<svg viewBox="0 0 200 100"><path id="semester-1" d="M 0 0 H 200"/></svg>"#;
        let doc = RoadmapDocument::from_svg(svg, DEFAULT_SEGMENT_PREFIX).unwrap();
        let mut anchors = AnchorTables::default();
        anchors.popup = AnchorTable::new([0.0; 7]);
        let session = RoadmapSession::new(&doc, &anchors, 0.5);
        let viewport = ViewportBox {
            left: 5.0,
            top: 5.0,
            width: 90.0,
            height: 90.0,
            ..ViewportBox::default()
        };

        let placement = session.place(ViewContext::Popup, 1.0, &viewport);
        let html = PreviewPage::new(
            &doc,
            ViewContext::Popup,
            1.0,
            SegmentId::new(1).unwrap(),
            viewport,
            placement,
        )
        .render()
        .unwrap();

        // road start sits at the top-left corner of the image box
        assert!(html.contains("style=\"left: 5.000%; top: 5.000%; transform:"));
        assert!(html.contains(
            "class=\"frame\" style=\"left: 5.000%; top: 5.000%; width: 90.000%; height: 90.000%;\""
        ));
        assert!(html.contains("aspect-ratio: 2.000000;"));
    }
}
