//! Progress values derived from a student's module record
//!
//! A progress value of `n + f` means "working on semester `n`, fraction `f`
//! of it done". The roadmap only uses the integer part; the fraction is kept
//! for display.

use crate::core::roadmap::segment::{MAX_PROGRESS, MIN_PROGRESS};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Modules per semester assumed when only a passed-module count is known
pub const MODULES_PER_SEMESTER: f64 = 7.0;

/// Completed/total module counts for one semester of the curriculum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterRecord {
    /// Semester number, 1-based
    pub semester: u8,
    /// Modules offered in the semester
    pub total: u32,
    /// Modules passed or credited
    pub completed: u32,
}

impl SemesterRecord {
    /// Completion fraction, taking elective semesters into account.
    ///
    /// Semester 5 counts as done with one elective, semester 6 with two.
    #[must_use]
    pub fn completion(&self) -> f64 {
        let required = match self.semester {
            5 => Some(1),
            6 => Some(2),
            _ => None,
        };
        if required.is_some_and(|n| self.completed >= n) {
            return 1.0;
        }
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.completed) / f64::from(self.total)
    }
}

/// Progress value from per-semester completion.
///
/// Walks semesters in order; a complete semester moves the position to the
/// start of the next one, the first incomplete semester contributes its
/// fraction and ends the walk. Semesters without modules are skipped.
#[must_use]
pub fn position_from_semesters(records: &[SemesterRecord]) -> f64 {
    let mut ordered: Vec<&SemesterRecord> = records.iter().filter(|r| r.total > 0).collect();
    ordered.sort_by_key(|r| r.semester);

    let mut position = MIN_PROGRESS;
    for record in ordered {
        let fraction = record.completion();
        crate::debug!(
            "Semester {}: {}/{} ({:.0}%)",
            record.semester,
            record.completed,
            record.total,
            fraction * 100.0
        );
        if fraction >= 1.0 {
            position = f64::from(record.semester) + 1.0;
        } else {
            position = f64::from(record.semester) + fraction;
            break;
        }
    }
    position.min(MAX_PROGRESS)
}

/// Coarse progress value from the number of passed modules
#[must_use]
pub fn position_from_passed_count(passed: u32) -> f64 {
    (f64::from(passed) / MODULES_PER_SEMESTER + 1.0).clamp(MIN_PROGRESS, MAX_PROGRESS)
}

/// Semester a student is working on for a given progress value
#[must_use]
pub fn working_semester(position: f64) -> u8 {
    match position {
        p if p < 2.0 => 1,
        p if p < 3.0 => 2,
        p if p < 4.0 => 3,
        p if p < 5.0 => 4,
        p if p < 6.0 => 5,
        p if p < 6.5 => 6,
        _ => 7,
    }
}

/// Whole calendar months from `start` to `reference`, never negative.
///
/// Only year and month count; the day of the month is ignored.
#[must_use]
pub fn months_since(start: NaiveDate, reference: NaiveDate) -> u32 {
    let months = i64::from(reference.year() - start.year()) * 12 + i64::from(reference.month())
        - i64::from(start.month());
    u32::try_from(months).unwrap_or(0)
}

/// Semester expected by calendar time: six months per semester, starting at 1
#[must_use]
pub fn semester_since(start: NaiveDate, reference: NaiveDate) -> u32 {
    months_since(start, reference) / 6 + 1
}

/// Regular length of study for a time model
#[must_use]
pub fn max_semester(time_model: Option<&str>) -> u8 {
    match time_model.map(str::trim) {
        Some("Teilzeit I") => 8,
        Some("Teilzeit II") => 10,
        _ => 7,
    }
}

/// Everything known about a student's progress, as read from a JSON file.
///
/// German field names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentSnapshot {
    /// Student identifier
    #[serde(alias = "student_id")]
    pub id: Option<u64>,
    /// Display name
    pub name: Option<String>,
    /// Grade average; absent when nothing has been graded yet
    #[serde(alias = "durchschnittsnote")]
    pub average_grade: Option<f64>,
    /// Passed or credited modules
    #[serde(alias = "anzahl_bestandene_module")]
    pub passed_modules: u32,
    /// Booked modules
    #[serde(alias = "anzahl_gebuchte_module")]
    pub booked_modules: u32,
    /// Outstanding fees in euros
    #[serde(alias = "offene_gebuehren")]
    pub open_fees: f64,
    /// Semester the student should be in by enrolment date
    #[serde(alias = "erwartetes_semester")]
    pub expected_semester: f64,
    /// Enrolment start; when present the expected semester is derived from it
    #[serde(alias = "start_datum")]
    pub start_date: Option<NaiveDate>,
    /// Time model name, e.g. `Vollzeit` or `Teilzeit I`
    #[serde(alias = "zeitmodell")]
    pub time_model: Option<String>,
    /// Per-semester module counts
    pub semesters: Vec<SemesterRecord>,
    /// Explicit progress value; wins over anything derived
    pub progress: Option<f64>,
}

impl Default for StudentSnapshot {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            average_grade: None,
            passed_modules: 0,
            booked_modules: 0,
            open_fees: 0.0,
            expected_semester: MIN_PROGRESS,
            start_date: None,
            time_model: None,
            semesters: Vec::new(),
            progress: None,
        }
    }
}

impl StudentSnapshot {
    /// Progress value used for the roadmap marker
    #[must_use]
    pub fn position(&self) -> f64 {
        if let Some(progress) = self.progress.filter(|p| p.is_finite()) {
            return progress.clamp(MIN_PROGRESS, MAX_PROGRESS);
        }
        if self.semesters.is_empty() {
            position_from_passed_count(self.passed_modules)
        } else {
            position_from_semesters(&self.semesters)
        }
    }

    /// Progress value measured by passed modules, compared against the expected semester
    #[must_use]
    pub fn module_semester(&self) -> f64 {
        position_from_passed_count(self.passed_modules)
    }

    /// Expected semester on `today`.
    ///
    /// Derived from `start_date` when it is set, otherwise the stored
    /// `expected_semester`.
    #[must_use]
    pub fn expected_semester_on(&self, today: NaiveDate) -> f64 {
        self.start_date.map_or(self.expected_semester, |start| {
            f64::from(semester_since(start, today))
        })
    }

    /// Regular study length for the snapshot's time model
    #[must_use]
    pub fn max_semester(&self) -> u8 {
        max_semester(self.time_model.as_deref())
    }
}
