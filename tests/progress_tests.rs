//! Integration tests from a student record to marker and status texts

use chrono::NaiveDate;
use semester_roadmap::core::loader::DEFAULT_SEGMENT_PREFIX;
use semester_roadmap::core::progress::{working_semester, StudentSnapshot};
use semester_roadmap::core::roadmap::AnchorTables;
use semester_roadmap::core::status::{
    FeeCategory, GradeCategory, Language, OverallStatus, ProgressFigures, StatusTexts,
    TimeCategory,
};
use semester_roadmap::{RoadmapDocument, RoadmapSession, ViewContext};
use std::fs;
use tempfile::TempDir;

const STUDENT: &str = r#"{
  "student_id": 4711,
  "name": "Alex Muster",
  "durchschnittsnote": 1.7,
  "anzahl_bestandene_module": 14,
  "offene_gebuehren": 1234.5,
  "erwartetes_semester": 2.5,
  "zeitmodell": "Teilzeit I",
  "semesters": [
    { "semester": 1, "total": 6, "completed": 6 },
    { "semester": 2, "total": 8, "completed": 4 },
    { "semester": 3, "total": 7, "completed": 0 }
  ]
}"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
}

fn figures(student: &StudentSnapshot) -> ProgressFigures {
    ProgressFigures::from_snapshot(student, today())
}

#[test]
fn snapshot_reads_german_field_names() {
    let student: StudentSnapshot = serde_json::from_str(STUDENT).unwrap();
    assert_eq!(student.id, Some(4711));
    assert_eq!(student.passed_modules, 14);
    assert_eq!(student.max_semester(), 8);
    assert!((student.position() - 2.5).abs() < 1e-12);
    assert_eq!(working_semester(student.position()), 2);
}

#[test]
fn snapshot_places_marker_on_builtin_roadmap() {
    let student: StudentSnapshot = serde_json::from_str(STUDENT).unwrap();
    let doc = RoadmapDocument::builtin(DEFAULT_SEGMENT_PREFIX).unwrap();
    let session = RoadmapSession::new(&doc, &AnchorTables::default(), 0.5);

    let resolution = session.resolve(ViewContext::Full, student.position());
    assert_eq!(resolution.segment().get(), 2);
    assert!(resolution.is_positioned());
}

#[test]
fn status_from_snapshot() {
    let student: StudentSnapshot = serde_json::from_str(STUDENT).unwrap();
    let status = figures(&student).status();

    assert_eq!(status.grade_category, GradeCategory::Fast);
    assert_eq!(status.days_difference, 90);
    assert_eq!(status.time_category, TimeCategory::Plus);
    assert!(!status.on_schedule);
    assert_eq!(status.fee_category, FeeCategory::Open);
    assert_eq!(status.open_fees_formatted, "1.234,50 €");
    assert_eq!(status.overall, OverallStatus::Okay);
}

#[test]
fn status_lines_in_both_languages() {
    let student: StudentSnapshot = serde_json::from_str(STUDENT).unwrap();
    let texts = StatusTexts::builtin();
    let figures = figures(&student);

    let de = texts.lines(&figures, Language::De);
    assert_eq!(de.grade, "📊 1.7 – Stabile Fahrt auf der Überholspur");
    assert_eq!(de.time, "⚡ +90 Tage Puffer im Vergleich zum Zeitplan");
    assert_eq!(de.fee, "🔋 1.234,50 € Gebühren offen");

    let en = texts.lines(&figures, Language::En);
    assert_eq!(en.fee, "🔋 1.234,50 € fees outstanding");
}

#[test]
fn empty_snapshot_starts_at_the_beginning() {
    let student: StudentSnapshot = serde_json::from_str("{}").unwrap();
    assert!((student.position() - 1.0).abs() < f64::EPSILON);

    let lines = StatusTexts::builtin().lines(&figures(&student), Language::En);
    assert_eq!(lines.grade, "No grades yet – Journey begins!");
    assert_eq!(lines.fee, "🔋 All fees paid");
}

#[test]
fn enrolment_date_sets_the_schedule() {
    let json = r#"{ "anzahl_bestandene_module": 14, "start_datum": "2025-01-10" }"#;
    let student: StudentSnapshot = serde_json::from_str(json).unwrap();
    let status = figures(&student).status();

    // 21 months enrolled: semester 4 expected, semester 3 reached by modules
    assert_eq!(status.days_difference, -180);
    assert_eq!(status.time_category, TimeCategory::Minus);

    let line = StatusTexts::builtin().time_text(&figures(&student), Language::En);
    assert_eq!(line, "⚡ -180 days – Floor it!");
}

#[test]
fn custom_texts_file_is_used() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("texts.json");
    let custom = StatusTexts::builtin()
        .grade
        .into_iter()
        .map(|(key, mut text)| {
            text.en = format!("custom {key}");
            (key, text)
        })
        .collect();
    let texts = StatusTexts {
        grade: custom,
        ..StatusTexts::builtin()
    };
    fs::write(&path, serde_json::to_string(&texts).unwrap()).expect("Failed to write texts");

    let loaded = StatusTexts::load_or_builtin(&path);
    let student = StudentSnapshot::default();
    assert_eq!(
        loaded.grade_text(&figures(&student), Language::En),
        "custom unknown"
    );
}

#[test]
fn broken_texts_file_falls_back_to_builtin() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("texts.json");
    fs::write(&path, "{ not json").expect("Failed to write texts");

    assert_eq!(StatusTexts::load_or_builtin(&path), StatusTexts::builtin());
    assert_eq!(
        StatusTexts::load_or_builtin(&dir.path().join("absent.json")),
        StatusTexts::builtin()
    );
}
