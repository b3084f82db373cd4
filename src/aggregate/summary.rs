//! Session summary construction
//!
//! Profiles are built in two phases. The roster comes first, so every
//! rostered driver and team exists even without a single accepted lap. Laps
//! are attached second; a lap from a driver missing in the roster creates a
//! placeholder driver on the "Unknown" team.

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::driver::{DriverProfile, DriverStats};
use super::team::TeamProfile;
use crate::outlier::FilteredLaps;
use crate::types::{RosterEntry, UNKNOWN_TEAM, placeholder_name};

/// Finished driver and team profiles for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    teams: Vec<TeamProfile>,
}

impl SessionSummary {
    /// Start a summary from the session roster.
    pub fn builder(roster: &[RosterEntry]) -> SummaryBuilder {
        SummaryBuilder::from_roster(roster)
    }

    /// Build a summary from the roster and the filtered laps in one step.
    pub fn build(roster: &[RosterEntry], laps: &FilteredLaps) -> Self {
        let mut builder = SummaryBuilder::from_roster(roster);
        builder.attach(laps);
        builder.finish()
    }

    pub fn teams(&self) -> &[TeamProfile] {
        &self.teams
    }

    pub fn team(&self, name: &str) -> Option<&TeamProfile> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// All drivers, team by team, in roster order.
    pub fn drivers(&self) -> impl Iterator<Item = &DriverProfile> {
        self.teams.iter().flat_map(|t| t.drivers().iter())
    }

    pub fn driver(&self, number: u32) -> Option<&DriverProfile> {
        self.drivers().find(|d| d.number == number)
    }

    /// Every driver with its cached scalar statistics.
    pub fn driver_stats(&self) -> impl Iterator<Item = (&DriverProfile, &DriverStats)> {
        self.drivers().map(|d| (d, d.stats()))
    }

    pub fn driver_count(&self) -> usize {
        self.teams.iter().map(|t| t.drivers().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.driver_count() == 0
    }
}

/// Two-phase builder for [`SessionSummary`].
#[derive(Debug)]
pub struct SummaryBuilder {
    teams: Vec<TeamProfile>,
    /// Driver number -> index into `teams`
    team_of: HashMap<u32, usize>,
}

impl SummaryBuilder {
    /// Phase one: create every rostered driver and its team.
    ///
    /// Roster entries are taken in car-number order. A repeated car number
    /// keeps its last entry.
    pub fn from_roster(roster: &[RosterEntry]) -> Self {
        let mut entries: BTreeMap<u32, &RosterEntry> = BTreeMap::new();
        for entry in roster {
            if entries.insert(entry.driver_number, entry).is_some() {
                debug!(driver = entry.driver_number, "Duplicate roster entry replaces the earlier one");
            }
        }

        let mut builder = Self { teams: Vec::new(), team_of: HashMap::new() };
        for entry in entries.into_values() {
            let profile =
                DriverProfile::new(entry.driver_number, entry.display_name(), entry.team_name.clone());
            builder.insert(profile);
        }

        debug!(drivers = builder.team_of.len(), teams = builder.teams.len(), "Built roster profiles");
        builder
    }

    /// Phase two: attach filtered laps to their drivers.
    pub fn attach(&mut self, laps: &FilteredLaps) {
        for ((driver, compound), bucket) in &laps.buckets {
            if bucket.is_empty() {
                continue;
            }
            let profile = self.driver_mut_or_placeholder(*driver);
            for lap in bucket {
                profile.add_lap(*compound, lap.lap_time);
            }
        }
    }

    pub fn finish(self) -> SessionSummary {
        SessionSummary { teams: self.teams }
    }

    fn insert(&mut self, profile: DriverProfile) -> &mut DriverProfile {
        let index = match self.teams.iter().position(|t| t.name == profile.team_name) {
            Some(index) => index,
            None => {
                self.teams.push(TeamProfile::new(profile.team_name.clone()));
                self.teams.len() - 1
            }
        };
        self.team_of.insert(profile.number, index);
        self.teams[index].add_driver(profile)
    }

    fn driver_mut_or_placeholder(&mut self, number: u32) -> &mut DriverProfile {
        let slot = self
            .team_of
            .get(&number)
            .and_then(|&team| self.teams[team].position_of(number).map(|at| (team, at)));

        match slot {
            Some((team, at)) => self.teams[team].driver_at_mut(at),
            None => {
                warn!(driver = number, "Laps from a driver missing in the roster");
                self.insert(DriverProfile::new(number, placeholder_name(number), UNKNOWN_TEAM))
            }
        }
    }
}
