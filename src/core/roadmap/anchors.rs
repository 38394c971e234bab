//! Per-view anchor fractions
//!
//! Every segment has a fixed fraction of its arc length where the marker is
//! drawn. The full roadmap and the popup miniature are tuned independently,
//! so there is one table per [`ViewContext`].

use super::segment::{SegmentId, SEGMENT_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anchor fractions for the full-size roadmap, segment 1 first
pub const FULL_ANCHORS: [f64; SEGMENT_COUNT] = [0.50, 0.35, 0.40, 0.45, 0.30, 0.55, 0.05];

/// Anchor fractions for the popup miniature, segment 1 first
pub const POPUP_ANCHORS: [f64; SEGMENT_COUNT] = [0.45, 0.40, 0.40, 0.50, 0.35, 0.50, 0.10];

/// Which rendering of the roadmap a position is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewContext {
    /// Full-size dashboard roadmap
    #[default]
    Full,
    /// Miniature roadmap shown inside a popup
    Popup,
}

impl ViewContext {
    /// Both contexts, full first
    pub const ALL: [Self; 2] = [Self::Full, Self::Popup];
}

impl FromStr for ViewContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "popup" | "mini" => Ok(Self::Popup),
            _ => Err(format!("Unknown view context: '{s}'")),
        }
    }
}

impl fmt::Display for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Popup => write!(f, "popup"),
        }
    }
}

/// Seven anchor fractions, one per segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorTable([f64; SEGMENT_COUNT]);

impl AnchorTable {
    /// Create a table; values are clamped into `[0, 1]` and NaN becomes 0
    #[must_use]
    pub fn new(fractions: [f64; SEGMENT_COUNT]) -> Self {
        Self(fractions.map(sanitize_fraction))
    }

    /// Anchor fraction for a segment
    #[must_use]
    pub fn fraction(&self, id: SegmentId) -> f64 {
        sanitize_fraction(self.0[id.index()])
    }

    /// All fractions, segment 1 first
    #[must_use]
    pub const fn fractions(&self) -> &[f64; SEGMENT_COUNT] {
        &self.0
    }
}

impl FromStr for AnchorTable {
    type Err = String;

    /// Parse a comma-separated list of exactly seven fractions
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid anchor fraction: '{}'", part.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fractions: [f64; SEGMENT_COUNT] = values.try_into().map_err(|v: Vec<f64>| {
            format!(
                "Expected {SEGMENT_COUNT} anchor fractions, got {}",
                v.len()
            )
        })?;

        if let Some(bad) = fractions.iter().find(|f| !(0.0..=1.0).contains(*f)) {
            return Err(format!("Anchor fraction {bad} is outside [0, 1]"));
        }

        Ok(Self::new(fractions))
    }
}

impl fmt::Display for AnchorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Anchor tables for every view context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorTables {
    /// Full-size roadmap
    #[serde(default = "default_full")]
    pub full: AnchorTable,
    /// Popup miniature
    #[serde(default = "default_popup")]
    pub popup: AnchorTable,
}

impl AnchorTables {
    /// Table for a context
    #[must_use]
    pub const fn for_context(&self, context: ViewContext) -> &AnchorTable {
        match context {
            ViewContext::Full => &self.full,
            ViewContext::Popup => &self.popup,
        }
    }

    /// Mutable table for a context
    pub fn for_context_mut(&mut self, context: ViewContext) -> &mut AnchorTable {
        match context {
            ViewContext::Full => &mut self.full,
            ViewContext::Popup => &mut self.popup,
        }
    }
}

impl Default for AnchorTables {
    fn default() -> Self {
        Self {
            full: default_full(),
            popup: default_popup(),
        }
    }
}

fn default_full() -> AnchorTable {
    AnchorTable::new(FULL_ANCHORS)
}

fn default_popup() -> AnchorTable {
    AnchorTable::new(POPUP_ANCHORS)
}

fn sanitize_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_have_independent_tables() {
        let tables = AnchorTables::default();
        let seven = SegmentId::new(7).unwrap();
        assert!((tables.for_context(ViewContext::Full).fraction(seven) - 0.05).abs() < 1e-12);
        assert!((tables.for_context(ViewContext::Popup).fraction(seven) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_new_clamps_out_of_range() {
        let table = AnchorTable::new([-1.0, 2.0, f64::NAN, 0.5, 0.5, 0.5, 0.5]);
        assert_eq!(table.fractions()[..3], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_parse_table() {
        let table: AnchorTable = "0.1, 0.2,0.3,0.4,0.5,0.6,0.7".parse().unwrap();
        assert!((table.fraction(SegmentId::new(3).unwrap()) - 0.3).abs() < 1e-12);
        assert_eq!(table.to_string(), "0.1,0.2,0.3,0.4,0.5,0.6,0.7");
    }

    #[test]
    fn test_parse_table_rejects_wrong_count_and_range() {
        assert!("0.1,0.2".parse::<AnchorTable>().is_err());
        assert!("0.1,0.2,0.3,0.4,0.5,0.6,1.5".parse::<AnchorTable>().is_err());
        assert!("0.1,0.2,0.3,x,0.5,0.6,0.7".parse::<AnchorTable>().is_err());
    }

    #[test]
    fn test_view_context_parse() {
        assert_eq!("POPUP".parse::<ViewContext>(), Ok(ViewContext::Popup));
        assert_eq!("full".parse::<ViewContext>(), Ok(ViewContext::Full));
        assert!("side".parse::<ViewContext>().is_err());
    }
}
