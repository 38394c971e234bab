//! Configuration module for `semester-roadmap`

use crate::core::roadmap::segment::DEFAULT_TANGENT_DELTA;
use crate::core::roadmap::{AnchorTable, AnchorTables, ViewContext, ViewportConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory inside config values
const HOME_VARIABLE: &str = "$ROADMAP_HOME";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Roadmap SVG document
    #[serde(default)]
    pub svg: String,
    /// Status texts JSON; empty means the built-in table
    #[serde(default)]
    pub texts: String,
    /// Directory for generated preview pages
    #[serde(default)]
    pub preview_dir: String,
}

/// Roadmap geometry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapConfig {
    /// `id` prefix of segment paths in the SVG
    #[serde(default)]
    pub segment_prefix: String,
    /// Finite-difference step for heading estimation, in path units
    #[serde(default = "default_tangent_delta")]
    pub tangent_delta: f64,
}

const fn default_tangent_delta() -> f64 {
    DEFAULT_TANGENT_DELTA
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self {
            segment_prefix: String::new(),
            tangent_delta: DEFAULT_TANGENT_DELTA,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Roadmap settings
    #[serde(default)]
    pub roadmap: RoadmapConfig,
    /// Anchor fractions per view
    #[serde(default)]
    pub anchors: AnchorTables,
    /// On-screen boxes per view
    #[serde(default)]
    pub viewport: ViewportConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override roadmap SVG path
    pub svg: Option<String>,
    /// Override status texts path
    pub texts: Option<String>,
    /// Override preview output directory
    pub preview_dir: Option<String>,
    /// Override heading step
    pub tangent_delta: Option<f64>,
}

impl Config {
    /// Get the `$ROADMAP_HOME` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/semester-roadmap`
    /// - macOS: `~/Library/Application Support/semester-roadmap`
    /// - Windows: `%APPDATA%\semester-roadmap`
    #[must_use]
    pub fn get_roadmap_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("semester-roadmap")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only string fields that are empty here and non-empty in `defaults` are
    /// taken over, plus a non-positive tangent step.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        let strings = [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.paths.svg, &defaults.paths.svg),
            (&mut self.paths.texts, &defaults.paths.texts),
            (&mut self.paths.preview_dir, &defaults.paths.preview_dir),
            (
                &mut self.roadmap.segment_prefix,
                &defaults.roadmap.segment_prefix,
            ),
        ];
        for (value, default) in strings {
            if value.is_empty() && !default.is_empty() {
                value.clone_from(default);
                changed = true;
            }
        }

        if !(self.roadmap.tangent_delta.is_finite() && self.roadmap.tangent_delta > 0.0) {
            self.roadmap.tangent_delta = defaults.roadmap.tangent_delta;
            changed = true;
        }

        changed
    }

    /// Copy of this configuration with CLI overrides applied, for the current run
    ///
    /// `self` keeps the stored values, so saving it never persists an override.
    #[must_use]
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> Self {
        let mut effective = self.clone();
        effective.apply_overrides(overrides);
        effective
    }

    /// Apply CLI-provided overrides onto this configuration in place
    ///
    /// Saving the configuration afterwards writes the overridden values too;
    /// use [`Config::with_overrides`] to keep them out of the config file.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(svg) = &overrides.svg {
            self.paths.svg.clone_from(svg);
        }
        if let Some(texts) = &overrides.texts {
            self.paths.texts.clone_from(texts);
        }
        if let Some(preview_dir) = &overrides.preview_dir {
            self.paths.preview_dir.clone_from(preview_dir);
        }

        if let Some(delta) = overrides.tangent_delta {
            self.roadmap.tangent_delta = delta;
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds,
    /// inside [`get_roadmap_dir`](Self::get_roadmap_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_roadmap_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$ROADMAP_HOME` in a string
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(HOME_VARIABLE) {
            let home = Self::get_roadmap_dir();
            value.replace(HOME_VARIABLE, home.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Parses the string and expands `$ROADMAP_HOME` in path-like values.
    /// Missing fields use their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.svg = Self::expand_variables(&config.paths.svg);
        config.paths.texts = Self::expand_variables(&config.paths.texts);
        config.paths.preview_dir = Self::expand_variables(&config.paths.preview_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// Debug builds use `DefaultCLIConfigDebug.toml`, release builds
    /// `DefaultCLIConfigRelease.toml`.
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled in and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: load it, merge missing fields from
    ///   defaults and save it back when anything changed
    /// - First run: create the config directory and write the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            match fs::read_to_string(&config_file) {
                Ok(content) => match Self::from_toml(&content) {
                    Ok(mut config) => {
                        if config.merge_defaults(&defaults) {
                            let _ = config.save();
                        }
                        return config;
                    }
                    Err(e) => {
                        crate::warn!("Ignoring invalid config {}: {e}", config_file.display());
                    }
                },
                Err(e) => {
                    crate::warn!("Cannot read config {}: {e}", config_file.display());
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized, the directory
    /// cannot be created or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Anchor table for a view context
    #[must_use]
    pub const fn anchors_for(&self, context: ViewContext) -> &AnchorTable {
        self.anchors.for_context(context)
    }

    /// Get a configuration value by key
    ///
    /// Supported keys:
    /// - `level`, `file`, `verbose`: logging
    /// - `svg`, `texts`, `preview_dir`: paths
    /// - `segment_prefix`, `tangent_delta`: roadmap geometry
    /// - `anchors.full`, `anchors.popup`: comma-separated anchor fractions
    ///
    /// Returns `None` if the key is not recognized.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "svg" => Some(self.paths.svg.clone()),
            "texts" => Some(self.paths.texts.clone()),
            "preview_dir" | "preview-dir" => Some(self.paths.preview_dir.clone()),
            "segment_prefix" | "segment-prefix" => Some(self.roadmap.segment_prefix.clone()),
            "tangent_delta" | "tangent-delta" => Some(self.roadmap.tangent_delta.to_string()),
            _ => anchor_context(key).map(|ctx| self.anchors.for_context(ctx).to_string()),
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config only; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                value.parse::<crate::logger::Level>()?;
                self.logging.level = value.to_ascii_lowercase();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "svg" => self.paths.svg = value.to_string(),
            "texts" => self.paths.texts = value.to_string(),
            "preview_dir" | "preview-dir" => self.paths.preview_dir = value.to_string(),
            "segment_prefix" | "segment-prefix" => {
                if value.is_empty() {
                    return Err("Segment prefix must not be empty".to_string());
                }
                self.roadmap.segment_prefix = value.to_string();
            }
            "tangent_delta" | "tangent-delta" => {
                let delta = value
                    .parse::<f64>()
                    .ok()
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .ok_or_else(|| format!("Invalid tangent delta: '{value}' (expected > 0)"))?;
                self.roadmap.tangent_delta = delta;
            }
            _ => {
                let ctx = anchor_context(key).ok_or_else(|| format!("Unknown config key: '{key}'"))?;
                *self.anchors.for_context_mut(ctx) = value.parse()?;
            }
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "svg" => self.paths.svg.clone_from(&defaults.paths.svg),
            "texts" => self.paths.texts.clone_from(&defaults.paths.texts),
            "preview_dir" | "preview-dir" => {
                self.paths.preview_dir.clone_from(&defaults.paths.preview_dir);
            }
            "segment_prefix" | "segment-prefix" => self
                .roadmap
                .segment_prefix
                .clone_from(&defaults.roadmap.segment_prefix),
            "tangent_delta" | "tangent-delta" => {
                self.roadmap.tangent_delta = defaults.roadmap.tangent_delta;
            }
            _ => {
                let ctx = anchor_context(key).ok_or_else(|| format!("Unknown config key: '{key}'"))?;
                *self.anchors.for_context_mut(ctx) = *defaults.anchors.for_context(ctx);
            }
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if there is no file.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

/// `anchors.full` / `anchors.popup` (and `anchors_full` / `anchors_popup`)
fn anchor_context(key: &str) -> Option<ViewContext> {
    key.strip_prefix("anchors.")
        .or_else(|| key.strip_prefix("anchors_"))
        .and_then(|ctx| ctx.parse().ok())
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  svg = \"{}\"", self.paths.svg)?;
        writeln!(f, "  texts = \"{}\"", self.paths.texts)?;
        writeln!(f, "  preview_dir = \"{}\"", self.paths.preview_dir)?;

        writeln!(f, "\n[roadmap]")?;
        writeln!(f, "  segment_prefix = \"{}\"", self.roadmap.segment_prefix)?;
        writeln!(f, "  tangent_delta = {}", self.roadmap.tangent_delta)?;

        writeln!(f, "\n[anchors]")?;
        for ctx in ViewContext::ALL {
            writeln!(f, "  {ctx} = [{}]", self.anchors.for_context(ctx))?;
        }

        for ctx in ViewContext::ALL {
            let vp = self.viewport.for_context(ctx);
            writeln!(f, "\n[viewport.{ctx}]")?;
            writeln!(
                f,
                "  box = {}% {}% {}% x {}%",
                vp.left, vp.top, vp.width, vp.height
            )?;
            writeln!(f, "  fallback = {}% {}%", vp.fallback_left, vp.fallback_top)?;
        }

        Ok(())
    }
}
