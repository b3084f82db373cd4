//! Per-driver lap statistics

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::{PaceSource, RacePace, best_race_pace};
use crate::types::Compound;

/// Scalar statistics derived from a driver's accepted laps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriverStats {
    /// Fastest accepted SOFT lap (qualifying-style effort)
    pub fastest_soft: Option<f64>,
    /// Mean accepted MEDIUM lap
    pub average_medium: Option<f64>,
    /// Mean accepted HARD lap
    pub average_hard: Option<f64>,
    /// Better of the MEDIUM and HARD averages
    pub best_race_pace: Option<RacePace>,
}

/// One driver's identity and accepted laps for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverProfile {
    /// Car number
    pub number: u32,
    /// Display name
    pub name: String,
    /// Team the driver was rostered with
    pub team_name: String,
    laps: BTreeMap<Compound, Vec<f64>>,
    stats: OnceLock<DriverStats>,
}

impl DriverProfile {
    pub fn new(number: u32, name: impl Into<String>, team_name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            team_name: team_name.into(),
            laps: BTreeMap::new(),
            stats: OnceLock::new(),
        }
    }

    /// Append an accepted lap. Invalidates cached statistics.
    pub(crate) fn add_lap(&mut self, compound: Compound, lap_time: f64) {
        self.laps.entry(compound).or_default().push(lap_time);
        self.stats.take();
    }

    /// Accepted lap times on one compound, in the order they were accepted.
    pub fn laps(&self, compound: Compound) -> &[f64] {
        self.laps.get(&compound).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Compounds with at least one accepted lap.
    pub fn compounds(&self) -> impl Iterator<Item = Compound> + '_ {
        self.laps.iter().filter(|(_, laps)| !laps.is_empty()).map(|(compound, _)| *compound)
    }

    /// Accepted laps across every compound, including UNKNOWN.
    pub fn lap_count(&self) -> usize {
        self.laps.values().map(Vec::len).sum()
    }

    pub fn has_laps(&self) -> bool {
        self.lap_count() > 0
    }

    /// Fastest accepted lap on `compound`.
    pub fn fastest(&self, compound: Compound) -> Option<f64> {
        self.laps(compound).iter().copied().reduce(f64::min)
    }

    /// Arithmetic mean of accepted laps on `compound`.
    pub fn average(&self, compound: Compound) -> Option<f64> {
        mean(self.laps(compound))
    }

    /// Scalar statistics, computed on first use.
    pub fn stats(&self) -> &DriverStats {
        self.stats.get_or_init(|| DriverStats {
            fastest_soft: self.fastest(Compound::Soft),
            average_medium: self.average(Compound::Medium),
            average_hard: self.average(Compound::Hard),
            best_race_pace: best_race_pace(self),
        })
    }
}

impl PaceSource for DriverProfile {
    fn average(&self, compound: Compound) -> Option<f64> {
        DriverProfile::average(self, compound)
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
