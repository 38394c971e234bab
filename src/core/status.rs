//! Progress status categories and the localized texts shown next to the roadmap

use crate::core::progress::StudentSnapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Built-in texts used when no texts file is configured or it cannot be read
const BUILTIN_TEXTS: &str = include_str!("../assets/progress_texts.json");

/// Modules in a full degree programme
pub const TOTAL_MODULES: u32 = 49;

/// Days counted per semester of schedule difference
pub const DAYS_PER_SEMESTER: f64 = 180.0;

/// Schedule tolerance in days, either direction
pub const ON_SCHEDULE_DAYS: i64 = 30;

/// How the grade average is going
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeCategory {
    /// 2.0 or better
    Fast,
    /// Up to 3.0
    Medium,
    /// Worse than 3.0
    Slow,
    /// Nothing graded yet
    Unknown,
}

impl GradeCategory {
    /// Categorize an optional grade average
    #[must_use]
    pub fn of(grade: Option<f64>) -> Self {
        match grade {
            None => Self::Unknown,
            Some(g) if g <= 2.0 => Self::Fast,
            Some(g) if g <= 3.0 => Self::Medium,
            Some(_) => Self::Slow,
        }
    }

    /// Key used in the texts table
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::Unknown => "unknown",
        }
    }
}

/// Ahead of or behind the expected schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeCategory {
    /// On or ahead of schedule
    Plus,
    /// Behind schedule
    Minus,
}

impl TimeCategory {
    /// Key used in the texts table
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Plus => "plus",
            Self::Minus => "minus",
        }
    }
}

/// Whether fees are outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeCategory {
    /// Nothing owed
    Zero,
    /// Fees outstanding
    Open,
}

impl FeeCategory {
    /// Key used in the texts table
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Open => "open",
        }
    }
}

/// Combined verdict over grade, schedule and fees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// Grade, schedule and fees all fine
    Excellent,
    /// Grade and schedule fine
    Good,
    /// Grade or schedule fine
    Okay,
    /// Neither grade nor schedule fine
    Critical,
}

/// Raw figures a status is computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressFigures {
    /// Grade average, if any
    pub average_grade: Option<f64>,
    /// Passed modules
    pub passed_modules: u32,
    /// Outstanding fees in euros
    pub open_fees: f64,
    /// Semester reached by modules
    pub current_semester: f64,
    /// Semester expected by enrolment date
    pub expected_semester: f64,
}

/// Derived status, ready for display or JSON output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressStatus {
    /// Grade category
    pub grade_category: GradeCategory,
    /// Grade average with two decimals, or `—`
    pub average_grade_formatted: String,
    /// Schedule difference in days; positive is ahead
    pub days_difference: i64,
    /// Schedule category
    pub time_category: TimeCategory,
    /// Within the schedule tolerance
    pub on_schedule: bool,
    /// Fee category
    pub fee_category: FeeCategory,
    /// Outstanding fees, German formatting
    pub open_fees_formatted: String,
    /// Combined verdict
    pub overall: OverallStatus,
    /// Share of the programme passed, 0 to 100
    pub completion_percentage: f64,
}

impl ProgressFigures {
    /// Figures for a student on `today`.
    ///
    /// The schedule compares the semester reached by passed modules with the
    /// semester expected by calendar time.
    #[must_use]
    pub fn from_snapshot(snapshot: &StudentSnapshot, today: NaiveDate) -> Self {
        Self {
            average_grade: snapshot.average_grade,
            passed_modules: snapshot.passed_modules,
            open_fees: snapshot.open_fees,
            current_semester: snapshot.module_semester(),
            expected_semester: snapshot.expected_semester_on(today),
        }
    }

    /// `trunc((current - expected) * 180)`
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn days_difference(&self) -> i64 {
        ((self.current_semester - self.expected_semester) * DAYS_PER_SEMESTER) as i64
    }

    /// Whether the schedule difference is within tolerance
    #[must_use]
    pub fn is_on_schedule(&self) -> bool {
        (-ON_SCHEDULE_DAYS..=ON_SCHEDULE_DAYS).contains(&self.days_difference())
    }

    /// Share of `total_modules` passed, capped at 100
    #[must_use]
    pub fn completion_percentage(&self, total_modules: u32) -> f64 {
        if total_modules == 0 {
            return 0.0;
        }
        (f64::from(self.passed_modules) / f64::from(total_modules) * 100.0).min(100.0)
    }

    /// Combined verdict
    #[must_use]
    pub fn overall(&self) -> OverallStatus {
        let grade_ok = self.average_grade.map_or(true, |g| g <= 2.5);
        let time_ok = self.is_on_schedule();
        let fees_ok = self.open_fees <= 0.0;
        match (grade_ok, time_ok) {
            (true, true) if fees_ok => OverallStatus::Excellent,
            (true, true) => OverallStatus::Good,
            (true, false) | (false, true) => OverallStatus::Okay,
            (false, false) => OverallStatus::Critical,
        }
    }

    /// Compute every derived field
    #[must_use]
    pub fn status(&self) -> ProgressStatus {
        let days = self.days_difference();
        ProgressStatus {
            grade_category: GradeCategory::of(self.average_grade),
            average_grade_formatted: self
                .average_grade
                .filter(|g| *g != 0.0)
                .map_or_else(|| "—".to_string(), |g| format!("{g:.2}")),
            days_difference: days,
            time_category: if days >= 0 {
                TimeCategory::Plus
            } else {
                TimeCategory::Minus
            },
            on_schedule: self.is_on_schedule(),
            fee_category: if self.open_fees > 0.0 {
                FeeCategory::Open
            } else {
                FeeCategory::Zero
            },
            open_fees_formatted: format_euros(self.open_fees),
            overall: self.overall(),
            completion_percentage: self.completion_percentage(TOTAL_MODULES),
        }
    }
}

/// Format an amount German style: `1.234,56 €`
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_euros(amount: f64) -> String {
    let cents = if amount.is_finite() {
        (amount.abs() * 100.0).round() as u64
    } else {
        0
    };
    let euros = (cents / 100).to_string();
    let mut grouped = String::with_capacity(euros.len() + euros.len() / 3);
    for (i, digit) in euros.chars().enumerate() {
        if i > 0 && (euros.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped},{:02} €", cents % 100)
}

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// German
    #[default]
    De,
    /// English
    En,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "de" | "german" | "deutsch" => Ok(Self::De),
            "en" | "english" => Ok(Self::En),
            _ => Err(format!("Unknown language: '{s}'")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::De => write!(f, "de"),
            Self::En => write!(f, "en"),
        }
    }
}

/// One text in both languages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    /// German
    pub de: String,
    /// English
    pub en: String,
}

impl LocalizedText {
    /// Text for a language
    #[must_use]
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::De => &self.de,
            Language::En => &self.en,
        }
    }
}

/// Text templates keyed by category.
///
/// Templates may contain `%{value}` (grade), `%{days}` (absolute day
/// difference) and `%{amount}` (formatted fees).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTexts {
    /// Grade templates
    pub grade: BTreeMap<String, LocalizedText>,
    /// Schedule templates
    pub time: BTreeMap<String, LocalizedText>,
    /// Fee templates
    pub fee: BTreeMap<String, LocalizedText>,
}

/// The three status lines for one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLines {
    /// Grade line
    pub grade: String,
    /// Schedule line
    pub time: String,
    /// Fee line
    pub fee: String,
}

impl StatusTexts {
    /// Texts compiled into the binary
    ///
    /// # Panics
    ///
    /// Panics if the compiled-in table is not valid JSON; it is covered by tests.
    #[must_use]
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_TEXTS).expect("Failed to parse compiled-in status texts")
    }

    /// Load texts from a JSON file, falling back to the built-in table on any error
    #[must_use]
    pub fn load_or_builtin(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(texts) => {
                    crate::debug!("Status texts loaded from {}", path.display());
                    texts
                }
                Err(e) => {
                    crate::error!("Failed to parse status texts {}: {e}", path.display());
                    Self::builtin()
                }
            },
            Err(e) => {
                crate::error!("Status texts not found at {}: {e}", path.display());
                Self::builtin()
            }
        }
    }

    /// Grade line
    #[must_use]
    pub fn grade_text(&self, figures: &ProgressFigures, language: Language) -> String {
        let category = GradeCategory::of(figures.average_grade);
        let Some(template) = self.grade.get(category.key()) else {
            crate::warn!("No grade text for category '{}'", category.key());
            return match language {
                Language::De => "Noch keine Noten".to_string(),
                Language::En => "No grades yet".to_string(),
            };
        };
        let value = figures
            .average_grade
            .filter(|g| *g != 0.0)
            .map_or_else(|| "—".to_string(), |g| format!("{g:.1}"));
        template.get(language).replace("%{value}", &value)
    }

    /// Schedule line
    #[must_use]
    pub fn time_text(&self, figures: &ProgressFigures, language: Language) -> String {
        let status = figures.status();
        let days = status.days_difference.abs().to_string();
        let Some(template) = self.time.get(status.time_category.key()) else {
            crate::warn!("No time text for category '{}'", status.time_category.key());
            let sign = match status.time_category {
                TimeCategory::Plus => '+',
                TimeCategory::Minus => '-',
            };
            return match language {
                Language::De => format!("{sign}{days} Tage"),
                Language::En => format!("{sign}{days} days"),
            };
        };
        template.get(language).replace("%{days}", &days)
    }

    /// Fee line
    #[must_use]
    pub fn fee_text(&self, figures: &ProgressFigures, language: Language) -> String {
        let status = figures.status();
        let amount = &status.open_fees_formatted;
        let Some(template) = self.fee.get(status.fee_category.key()) else {
            crate::warn!("No fee text for category '{}'", status.fee_category.key());
            return match (status.fee_category, language) {
                (FeeCategory::Zero, Language::De) => "Keine offenen Gebühren".to_string(),
                (FeeCategory::Zero, Language::En) => "No open fees".to_string(),
                (FeeCategory::Open, Language::De) => format!("{amount} offen"),
                (FeeCategory::Open, Language::En) => format!("{amount} outstanding"),
            };
        };
        template.get(language).replace("%{amount}", amount)
    }

    /// All three lines
    #[must_use]
    pub fn lines(&self, figures: &ProgressFigures, language: Language) -> StatusLines {
        StatusLines {
            grade: self.grade_text(figures, language),
            time: self.time_text(figures, language),
            fee: self.fee_text(figures, language),
        }
    }
}

impl Default for StatusTexts {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figures(grade: Option<f64>, current: f64, expected: f64, fees: f64) -> ProgressFigures {
        ProgressFigures {
            average_grade: grade,
            passed_modules: 21,
            open_fees: fees,
            current_semester: current,
            expected_semester: expected,
        }
    }

    #[test]
    fn test_grade_categories() {
        assert_eq!(GradeCategory::of(None), GradeCategory::Unknown);
        assert_eq!(GradeCategory::of(Some(2.0)), GradeCategory::Fast);
        assert_eq!(GradeCategory::of(Some(2.7)), GradeCategory::Medium);
        assert_eq!(GradeCategory::of(Some(3.0)), GradeCategory::Medium);
        assert_eq!(GradeCategory::of(Some(3.3)), GradeCategory::Slow);
    }

    #[test]
    fn test_days_difference_truncates() {
        let f = figures(None, 2.1, 2.0, 0.0);
        assert_eq!(f.days_difference(), 18);
        let behind = figures(None, 1.0, 2.5, 0.0);
        assert_eq!(behind.days_difference(), -270);
        assert!(!behind.is_on_schedule());
        assert_eq!(behind.status().time_category, TimeCategory::Minus);
    }

    #[test]
    fn test_overall_status() {
        assert_eq!(figures(None, 2.0, 2.0, 0.0).overall(), OverallStatus::Excellent);
        assert_eq!(figures(Some(2.5), 2.0, 2.0, 10.0).overall(), OverallStatus::Good);
        assert_eq!(figures(Some(3.5), 2.0, 2.0, 0.0).overall(), OverallStatus::Okay);
        assert_eq!(figures(Some(3.5), 1.0, 3.0, 0.0).overall(), OverallStatus::Critical);
    }

    #[test]
    fn test_completion_percentage() {
        let f = figures(None, 1.0, 1.0, 0.0);
        assert!((f.completion_percentage(TOTAL_MODULES) - 21.0 / 49.0 * 100.0).abs() < 1e-9);
        assert!(f.completion_percentage(0).abs() < f64::EPSILON);
        assert!((f.completion_percentage(10) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_euros() {
        assert_eq!(format_euros(0.0), "0,00 €");
        assert_eq!(format_euros(1234.56), "1.234,56 €");
        assert_eq!(format_euros(1_000_000.0), "1.000.000,00 €");
        assert_eq!(format_euros(99.999), "100,00 €");
    }

    #[test]
    fn test_builtin_texts() {
        let texts = StatusTexts::builtin();
        let f = figures(Some(1.7), 3.0, 2.5, 1234.5);
        let lines = texts.lines(&f, Language::En);
        assert_eq!(lines.grade, "📊 1.7 – Cruising in the fast lane");
        assert_eq!(lines.time, "⚡ +90 days buffer – Cruise mode");
        assert_eq!(lines.fee, "🔋 1.234,50 € fees outstanding");

        let behind = figures(None, 1.0, 2.0, 0.0);
        let lines = texts.lines(&behind, Language::De);
        assert_eq!(lines.grade, "Noch keine Noten – Fahrt beginnt!");
        assert_eq!(lines.time, "⚡ -180 Tage Verzug – DC-Schnellladen erforderlich!");
        assert_eq!(lines.fee, "🔋 Alle Gebühren beglichen");
    }

    #[test]
    fn test_missing_grade_category_falls_back() {
        let mut texts = StatusTexts::builtin();
        texts.grade.clear();
        let f = figures(Some(1.0), 1.0, 1.0, 0.0);
        assert_eq!(texts.grade_text(&f, Language::De), "Noch keine Noten");
        assert_eq!(texts.grade_text(&f, Language::En), "No grades yet");
    }

    #[test]
    fn test_missing_time_and_fee_categories_fall_back() {
        let mut texts = StatusTexts::builtin();
        texts.time.clear();
        texts.fee.clear();

        let behind = figures(None, 1.0, 2.0, 12.5);
        assert_eq!(texts.time_text(&behind, Language::De), "-180 Tage");
        assert_eq!(texts.time_text(&behind, Language::En), "-180 days");
        assert_eq!(texts.fee_text(&behind, Language::De), "12,50 € offen");
        assert_eq!(texts.fee_text(&behind, Language::En), "12,50 € outstanding");

        let settled = figures(None, 2.0, 1.0, 0.0);
        assert_eq!(texts.time_text(&settled, Language::En), "+180 days");
        assert_eq!(texts.fee_text(&settled, Language::De), "Keine offenen Gebühren");
    }

    #[test]
    fn test_load_or_builtin_missing_file() {
        let texts = StatusTexts::load_or_builtin(Path::new("/nonexistent/texts.json"));
        assert_eq!(texts, StatusTexts::builtin());
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::En));
        assert_eq!("deutsch".parse::<Language>(), Ok(Language::De));
        assert!("fr".parse::<Language>().is_err());
    }
}
