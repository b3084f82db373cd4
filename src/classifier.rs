//! Lap classification
//!
//! Filters raw laps down to the ones that say something about tire
//! performance and buckets the survivors by (driver, compound).
//!
//! A lap is excluded when:
//! - the driver number is absent or zero
//! - the lap number is absent or zero
//! - the duration is absent, not finite, or not positive
//! - race control deleted it
//! - it is a pit-out lap
//!
//! Laps whose compound cannot be resolved land in their own
//! [`Compound::Unknown`] bucket and are never merged into a known compound.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::stint_index::StintIndex;
use crate::types::{Compound, LapSample, TimedLap};

/// Bucket key: driver number and compound.
pub type BucketKey = (u32, Compound);

/// Counts of kept and excluded laps for one classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassifyStats {
    pub kept: usize,
    pub missing_driver: usize,
    pub missing_lap_number: usize,
    pub missing_time: usize,
    pub deleted: usize,
    pub pit_out: usize,
    pub unknown_compound: usize,
}

impl ClassifyStats {
    /// Laps that did not make it into any bucket.
    pub fn excluded(&self) -> usize {
        self.missing_driver + self.missing_lap_number + self.missing_time + self.deleted + self.pit_out
    }
}

/// Laps grouped by (driver, compound), each bucket lap-number ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedLaps {
    buckets: BTreeMap<BucketKey, Vec<TimedLap>>,
    stats: ClassifyStats,
}

impl ClassifiedLaps {
    pub fn get(&self, driver_number: u32, compound: Compound) -> &[TimedLap] {
        self.buckets.get(&(driver_number, compound)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BucketKey, &Vec<TimedLap>)> {
        self.buckets.iter()
    }

    pub fn stats(&self) -> ClassifyStats {
        self.stats
    }

    /// Driver numbers with at least one kept lap, ascending.
    pub fn drivers(&self) -> Vec<u32> {
        let mut drivers: Vec<u32> = self.buckets.keys().map(|(driver, _)| *driver).collect();
        drivers.dedup();
        drivers
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn into_buckets(self) -> BTreeMap<BucketKey, Vec<TimedLap>> {
        self.buckets
    }
}

enum Verdict {
    Keep { driver: u32, lap_number: u32, lap_time: f64 },
    MissingDriver,
    MissingLapNumber,
    MissingTime,
    Deleted,
    PitOut,
}

fn judge(lap: &LapSample) -> Verdict {
    // Pit-out wins over every other reason so out-laps are never counted as
    // merely "deleted" or "untimed".
    if lap.is_pit_out() {
        return Verdict::PitOut;
    }

    let Some(driver) = lap.driver_number.filter(|n| *n > 0) else {
        return Verdict::MissingDriver;
    };
    let Some(lap_time) = lap.lap_duration.filter(|t| t.is_finite() && *t > 0.0) else {
        return Verdict::MissingTime;
    };
    if lap.is_deleted() {
        return Verdict::Deleted;
    }
    let Some(lap_number) = lap.lap_number.filter(|n| *n > 0) else {
        return Verdict::MissingLapNumber;
    };

    Verdict::Keep { driver, lap_number, lap_time }
}

/// Classify laps against the stint index.
pub fn classify<'a, I>(laps: I, stints: &StintIndex) -> ClassifiedLaps
where
    I: IntoIterator<Item = &'a LapSample>,
{
    let mut buckets: BTreeMap<BucketKey, Vec<TimedLap>> = BTreeMap::new();
    let mut stats = ClassifyStats::default();

    for lap in laps {
        match judge(lap) {
            Verdict::Keep { driver, lap_number, lap_time } => {
                let compound = stints.compound_at(driver, lap_number);
                if compound == Compound::Unknown {
                    stats.unknown_compound += 1;
                }
                trace!(driver, lap_number, lap_time, %compound, "Lap kept");
                buckets.entry((driver, compound)).or_default().push(TimedLap::new(lap_time, lap_number));
                stats.kept += 1;
            }
            Verdict::MissingDriver => stats.missing_driver += 1,
            Verdict::MissingLapNumber => stats.missing_lap_number += 1,
            Verdict::MissingTime => stats.missing_time += 1,
            Verdict::Deleted => stats.deleted += 1,
            Verdict::PitOut => stats.pit_out += 1,
        }
    }

    for bucket in buckets.values_mut() {
        bucket.sort_by(|a, b| a.lap_number.cmp(&b.lap_number).then(a.lap_time.total_cmp(&b.lap_time)));
    }

    debug!(
        kept = stats.kept,
        excluded = stats.excluded(),
        pit_out = stats.pit_out,
        deleted = stats.deleted,
        unknown_compound = stats.unknown_compound,
        buckets = buckets.len(),
        "Classified laps"
    );

    ClassifiedLaps { buckets, stats }
}
