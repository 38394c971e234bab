//! Preview command handler

use chrono::Local;
use semester_roadmap::config::Config;
use semester_roadmap::core::preview::PreviewPage;
use semester_roadmap::core::progress::StudentSnapshot;
use semester_roadmap::core::status::{Language, ProgressFigures};
use semester_roadmap::{error, ViewContext};
use std::path::{Path, PathBuf};

/// Run the preview command
pub fn run(
    input_file: Option<&Path>,
    progress: Option<f64>,
    output: Option<&Path>,
    context: ViewContext,
    language: Language,
    config: &Config,
) {
    let snapshot = match input_file.map(super::read_student).transpose() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let progress = snapshot
        .as_ref()
        .map_or_else(|| progress.unwrap_or(1.0), StudentSnapshot::position);

    let (Some(document), session) = super::load_session(config) else {
        eprintln!("✗ Nothing to preview without a roadmap");
        std::process::exit(1);
    };

    let resolution = session.resolve(context, progress);
    let viewport = config.viewport.for_context(context);
    let placement = resolution.position().map_or_else(
        || viewport.fallback(),
        |pos| viewport.place(&session.view_box(), pos),
    );

    let mut page = PreviewPage::new(
        &document,
        context,
        progress,
        resolution.segment(),
        *viewport,
        placement,
    );
    if let Some(snapshot) = &snapshot {
        let figures = ProgressFigures::from_snapshot(snapshot, Local::now().date_naive());
        page = page.with_status(super::load_texts(config).lines(&figures, language), language);
        if let Some(name) = &snapshot.name {
            page = page.with_title(format!("{name}: semester {}", resolution.segment()));
        }
    }

    let output_path = output.map_or_else(
        || {
            PathBuf::from(&config.paths.preview_dir)
                .join(format!("preview-{}-{context}.html", resolution.segment()))
        },
        Path::to_path_buf,
    );

    match page.write_to(&output_path) {
        Ok(()) => println!("✓ Preview written: {}", output_path.display()),
        Err(e) => {
            error!("Failed to write preview: {e}");
            eprintln!("✗ Failed to write preview {}: {e}", output_path.display());
            std::process::exit(1);
        }
    }
}
