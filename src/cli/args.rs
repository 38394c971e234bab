//! CLI argument definitions for `roadmap`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use semester_roadmap::config::ConfigOverrides;
use semester_roadmap::core::status::Language;
use semester_roadmap::logger::Level;
use semester_roadmap::ViewContext;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

/// Which roadmap rendering to place the marker on
#[derive(Copy, Clone, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum ContextArg {
    /// Full-size roadmap
    #[default]
    Full,
    /// Popup miniature
    #[value(alias = "mini")]
    Popup,
}

impl From<ContextArg> for ViewContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Full => Self::Full,
            ContextArg::Popup => Self::Popup,
        }
    }
}

/// Language of the status texts
#[derive(Copy, Clone, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum LangArg {
    /// German
    #[default]
    De,
    /// English
    En,
}

impl From<LangArg> for Language {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::De => Self::De,
            LangArg::En => Self::En,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `svg`, `anchors.full`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Resolve a progress value to a marker position.
    ///
    /// Prints the segment, the point in SVG user units, the heading and
    /// whether the marker is mirrored.
    Resolve {
        /// Progress value (1.0 to 7.0; out-of-range values are clamped)
        #[arg(value_name = "PROGRESS", allow_hyphen_values = true)]
        progress: f64,

        /// Roadmap rendering to resolve for
        #[arg(short, long, value_enum, default_value_t = ContextArg::Full)]
        context: ContextArg,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Place a student on the roadmap from a JSON snapshot.
    ///
    /// Derives the progress value from the student's modules and prints the
    /// marker position together with the status texts.
    Student {
        /// Path to the student JSON file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Roadmap rendering to resolve for
        #[arg(short, long, value_enum, default_value_t = ContextArg::Full)]
        context: ContextArg,

        /// Language of the status texts
        #[arg(short, long, value_enum, default_value_t = LangArg::De)]
        lang: LangArg,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write an HTML page showing the marker on the roadmap.
    Preview {
        /// Student JSON file to take the progress from
        #[arg(value_name = "FILE", required_unless_present = "progress", conflicts_with = "progress")]
        input_file: Option<PathBuf>,

        /// Progress value to preview instead of a student file
        #[arg(short, long, value_name = "PROGRESS", allow_hyphen_values = true)]
        progress: Option<f64>,

        /// Output file (defaults to `preview-<segment>-<context>.html` in the config `preview_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Roadmap rendering to preview
        #[arg(short, long, value_enum, default_value_t = ContextArg::Full)]
        context: ContextArg,

        /// Language of the status texts
        #[arg(short, long, value_enum, default_value_t = LangArg::De)]
        lang: LangArg,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "roadmap",
    about = "Semester roadmap marker resolver",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level for this run
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config roadmap SVG
    #[arg(long = "config-svg", value_name = "FILE")]
    pub config_svg: Option<PathBuf>,

    /// Override config roadmap SVG (short form)
    #[arg(long = "svg", value_name = "FILE", global = true)]
    pub svg: Option<PathBuf>,

    /// Override config status texts file
    #[arg(long = "config-texts", value_name = "FILE")]
    pub config_texts: Option<PathBuf>,

    /// Override config status texts file (short form)
    #[arg(long = "texts", value_name = "FILE", global = true)]
    pub texts: Option<PathBuf>,

    /// Override config preview directory
    #[arg(long = "config-preview-dir", value_name = "DIR")]
    pub config_preview_dir: Option<PathBuf>,

    /// Override config preview directory (short form)
    #[arg(long = "preview-dir", value_name = "DIR", global = true)]
    pub preview_dir: Option<PathBuf>,

    /// Override the heading step in path units
    #[arg(long = "tangent-delta", value_name = "UNITS", global = true)]
    pub tangent_delta: Option<f64>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--svg`) take precedence over long-form flags
    /// (e.g., `--config-svg`) when both are provided. `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            svg: path_string(self.svg.as_ref().or(self.config_svg.as_ref())),
            texts: path_string(self.texts.as_ref().or(self.config_texts.as_ref())),
            preview_dir: path_string(
                self.preview_dir
                    .as_ref()
                    .or(self.config_preview_dir.as_ref()),
            ),
            tangent_delta: self.tangent_delta,
        }
    }
}
