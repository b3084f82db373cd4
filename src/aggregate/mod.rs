//! Driver and team aggregation.
//!
//! Turns filtered lap buckets into [`DriverProfile`]s grouped under
//! [`TeamProfile`]s, and derives the scalar statistics the report and the
//! store consume.
//!
//! Statistics only ever look at SOFT, MEDIUM and HARD laps. Laps on an
//! unresolved compound are carried in the profile but never contribute to a
//! number.
//!
//! ## Usage Example
//!
//! ```rust
//! use paddock::aggregate::{SessionSummary, best_race_pace};
//! use paddock::outlier::FilteredLaps;
//! use paddock::types::{Compound, RosterEntry, TimedLap};
//!
//! let roster = vec![RosterEntry::new(4, "Lando", "Norris", "McLaren")];
//! let mut laps = FilteredLaps::default();
//! laps.buckets.insert((4, Compound::Hard), vec![TimedLap::new(98.0, 20), TimedLap::new(98.4, 21)]);
//!
//! let summary = SessionSummary::build(&roster, &laps);
//! let driver = summary.driver(4).unwrap();
//! let pace = best_race_pace(driver).unwrap();
//! assert_eq!(pace.compound, Compound::Hard);
//! ```

mod driver;
mod summary;
mod team;

pub use driver::{DriverProfile, DriverStats};
pub use summary::{SessionSummary, SummaryBuilder};
pub use team::TeamProfile;

use serde::Serialize;

use crate::types::Compound;

/// Anything that can report an average lap time per compound.
///
/// Implemented by driver and team views so race-pace selection works the
/// same way on both.
pub trait PaceSource {
    fn average(&self, compound: Compound) -> Option<f64>;
}

/// A race-pace average and the compound it was set on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RacePace {
    pub time: f64,
    pub compound: Compound,
}

/// The smaller of the MEDIUM and HARD averages.
///
/// One absent yields the other; both absent yields `None`. An exact tie goes
/// to MEDIUM.
pub fn best_race_pace<P: PaceSource + ?Sized>(source: &P) -> Option<RacePace> {
    let mut best: Option<RacePace> = None;
    for compound in Compound::RACE_PACE {
        let Some(time) = source.average(compound) else {
            continue;
        };
        match best {
            Some(current) if current.time <= time => {}
            _ => best = Some(RacePace { time, compound }),
        }
    }
    best
}
