//! Student command handler

use super::resolve::{print_output, resolve_output, ResolveOutput};
use chrono::Local;
use semester_roadmap::config::Config;
use semester_roadmap::core::progress::working_semester;
use semester_roadmap::core::status::{Language, ProgressFigures, ProgressStatus, StatusLines};
use semester_roadmap::{error, info, ViewContext};
use serde::Serialize;
use std::path::Path;

/// JSON shape printed by `student --json`
#[derive(Debug, Serialize)]
pub struct StudentOutput {
    /// Student name, if present in the snapshot
    pub name: Option<String>,
    /// Semester the student is working on
    pub working_semester: u8,
    /// Regular study length for the time model
    pub max_semester: u8,
    /// Marker position
    #[serde(flatten)]
    pub marker: ResolveOutput,
    /// Derived status
    pub status: ProgressStatus,
    /// Localized status lines
    pub texts: StatusLines,
}

/// Run the student command
pub fn run(input_file: &Path, context: ViewContext, language: Language, json: bool, config: &Config) {
    let snapshot = match super::read_student(input_file) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    info!("Student loaded: {}", input_file.display());

    let (_, session) = super::load_session(config);
    let position = snapshot.position();
    let figures = ProgressFigures::from_snapshot(&snapshot, Local::now().date_naive());
    let output = StudentOutput {
        name: snapshot.name.clone(),
        working_semester: working_semester(position),
        max_semester: snapshot.max_semester(),
        marker: resolve_output(&session, config, context, position),
        status: figures.status(),
        texts: super::load_texts(config).lines(&figures, language),
    };

    if json {
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("✗ Failed to serialize result: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Some(name) = &output.name {
        println!("\n=== {name} ===\n");
    }
    println!(
        "Progress {:.2}: semester {} of {}",
        position, output.working_semester, output.max_semester
    );
    print_output(&output.marker);
    println!();
    println!("  {}", output.texts.grade);
    println!("  {}", output.texts.time);
    println!("  {}", output.texts.fee);
    println!(
        "\n  Status: {:?}, {:.0}% complete",
        output.status.overall, output.status.completion_percentage
    );
}
