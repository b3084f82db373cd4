//! Tire compound classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tire compound a lap was driven on.
///
/// Only the three slick compounds feed the pace statistics. Every other label
/// reported by the timing feed (intermediates, wets, test tires, missing
/// labels) resolves to [`Compound::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Unknown,
}

impl Compound {
    /// Compounds that take part in race-pace comparison, in tie-break order.
    pub const RACE_PACE: [Compound; 2] = [Compound::Medium, Compound::Hard];

    /// Resolve a timing feed label (case-insensitive).
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "SOFT" => Compound::Soft,
            "MEDIUM" => Compound::Medium,
            "HARD" => Compound::Hard,
            _ => Compound::Unknown,
        }
    }

    /// Upper-case label as stored and printed.
    pub fn label(self) -> &'static str {
        match self {
            Compound::Soft => "SOFT",
            Compound::Medium => "MEDIUM",
            Compound::Hard => "HARD",
            Compound::Unknown => "UNKNOWN",
        }
    }

    /// Whether laps on this compound are driven for sustained race pace.
    pub fn is_race_pace(self) -> bool {
        matches!(self, Compound::Medium | Compound::Hard)
    }

    pub fn is_known(self) -> bool {
        self != Compound::Unknown
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Option<&str>> for Compound {
    fn from(label: Option<&str>) -> Self {
        label.map(Compound::from_label).unwrap_or(Compound::Unknown)
    }
}
