//! Synthetic timing data for tests and benchmarks
//!
//! Generates deterministic sessions shaped like a real practice session:
//! a SOFT qualifying run, then MEDIUM and HARD long runs, with pit-out laps,
//! the odd deleted lap and traffic-affected outliers.

#![cfg(any(test, feature = "benchmark"))]

use crate::providers::FixtureProvider;
use crate::types::{Compound, LapSample, RosterEntry, SessionKey, SessionQuery, Stint};

const TEAMS: &[&str] = &[
    "Red Bull Racing",
    "Ferrari",
    "McLaren",
    "Mercedes",
    "Aston Martin",
    "Alpine",
    "Williams",
    "RB",
    "Kick Sauber",
    "Haas F1 Team",
];

/// Time added to a traffic-affected lap, in seconds.
pub const TRAFFIC_PENALTY: f64 = 25.0;

/// A generated session: roster, stints and laps for one session key.
#[derive(Debug, Clone)]
pub struct SyntheticSession {
    pub key: SessionKey,
    pub roster: Vec<RosterEntry>,
    pub stints: Vec<Stint>,
    pub laps: Vec<LapSample>,
}

impl SyntheticSession {
    /// `drivers` drivers, two per team, each running `laps_per_driver` laps.
    pub fn new(drivers: u32, laps_per_driver: u32) -> Self {
        let key = SessionKey(9999);
        let mut roster = Vec::new();
        let mut stints = Vec::new();
        let mut laps = Vec::new();

        for index in 0..drivers {
            let number = index + 1;
            let team = TEAMS[(index as usize / 2) % TEAMS.len()];
            roster.push(RosterEntry::new(number, "Driver", format!("Number{}", number), team));

            let plan = stint_plan(laps_per_driver);
            for (stint_number, (compound, start, end)) in plan.iter().enumerate() {
                stints.push(Stint::new(number, stint_number as u32 + 1, *compound, *start, *end));
            }

            let base = 68.0 + index as f64 * 0.15;
            for lap in 1..=laps_per_driver {
                let compound = plan
                    .iter()
                    .find(|(_, start, end)| (*start..=*end).contains(&lap))
                    .map(|(c, _, _)| *c)
                    .unwrap_or(Compound::Unknown);
                let offset = match compound {
                    Compound::Soft => 0.0,
                    Compound::Medium => 3.5,
                    Compound::Hard => 4.0,
                    Compound::Unknown => 6.0,
                };
                let mut time = base + offset + jitter(number, lap);
                if lap % 9 == 0 {
                    time += TRAFFIC_PENALTY;
                }

                let mut sample = LapSample::new(number, lap, time);
                if plan.iter().any(|(_, start, _)| *start == lap) {
                    sample = sample.pit_out();
                }
                if lap % 11 == 0 {
                    sample = sample.deleted();
                }
                laps.push(sample);
            }
        }

        Self { key, roster, stints, laps }
    }

    pub fn query(&self) -> SessionQuery {
        SessionQuery { track: "testring".to_string(), session: "Practice 2".to_string(), year: 2024 }
    }

    /// Provider serving this session under [`SyntheticSession::query`].
    pub fn provider(&self) -> FixtureProvider {
        let query = self.query();
        FixtureProvider::new()
            .with_session(self.key, &query.track, &query.session, query.year)
            .with_roster(self.key, self.roster.clone())
            .with_stints(self.key, self.stints.clone())
            .with_laps(self.key, self.laps.clone())
    }
}

/// SOFT for the first sixth, then MEDIUM and HARD halves of the rest.
fn stint_plan(laps: u32) -> Vec<(Compound, u32, u32)> {
    let soft_end = (laps / 6).max(1).min(laps);
    let medium_end = soft_end + (laps - soft_end) / 2;

    let mut plan = vec![(Compound::Soft, 1, soft_end)];
    if medium_end > soft_end {
        plan.push((Compound::Medium, soft_end + 1, medium_end));
    }
    if laps > medium_end {
        plan.push((Compound::Hard, medium_end + 1, laps));
    }
    plan
}

fn jitter(driver: u32, lap: u32) -> f64 {
    ((driver * 31 + lap * 17) % 13) as f64 * 0.037
}
