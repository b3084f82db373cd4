//! Compound-aware outlier filtering
//!
//! Each (driver, compound) bucket is trimmed of laps that do not represent
//! the tire's pace: traffic, cool-down laps, red-flag crawls.
//!
//! # Policy
//!
//! | Compound      | Bucket size | Rule                                             |
//! |---------------|-------------|--------------------------------------------------|
//! | MEDIUM / HARD | ≥ 5         | keep the fastest `floor(n × 0.9)` laps           |
//! | MEDIUM / HARD | < 5         | keep laps ≤ `max(fastest × 1.04, 65 s)`          |
//! | SOFT          | any         | keep laps ≤ `max(fastest × 1.08, 65 s)`          |
//! | UNKNOWN       | any         | unchanged; ignored by the statistics             |
//!
//! Race-pace compounds see many laps with fuel and degradation noise, so a
//! percentile trim drops the tail once there are enough samples. With few
//! samples a cutoff relative to the fastest lap is used instead; the absolute
//! floor stops it from becoming degenerately tight on very short tracks. SOFT
//! runs are single-lap efforts, so the tolerance is wider and the fastest lap
//! is extracted later.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::classifier::{BucketKey, ClassifiedLaps};
use crate::types::{Compound, TimedLap};

/// Thresholds of the two-tier filter.
///
/// [`OutlierPolicy::default`] holds the calibrated values; results are only
/// comparable between runs that use the same policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierPolicy {
    /// Minimum race-pace bucket size for the percentile trim
    pub percentile_min_laps: usize,
    /// Fraction of race-pace laps kept by the percentile trim
    pub percentile_keep: f64,
    /// Relative cutoff for small race-pace buckets
    pub race_pace_tolerance: f64,
    /// Relative cutoff for SOFT buckets
    pub soft_tolerance: f64,
    /// Lowest cutoff a relative rule may produce, in seconds
    pub cutoff_floor_secs: f64,
}

impl Default for OutlierPolicy {
    fn default() -> Self {
        Self {
            percentile_min_laps: 5,
            percentile_keep: 0.9,
            race_pace_tolerance: 1.04,
            soft_tolerance: 1.08,
            cutoff_floor_secs: 65.0,
        }
    }
}

/// Filtered buckets plus how many laps the filter discarded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredLaps {
    pub buckets: BTreeMap<BucketKey, Vec<TimedLap>>,
    pub discarded: usize,
}

impl FilteredLaps {
    pub fn get(&self, driver_number: u32, compound: Compound) -> &[TimedLap] {
        self.buckets.get(&(driver_number, compound)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lap_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

impl OutlierPolicy {
    /// Filter one bucket.
    ///
    /// The percentile branch returns laps fastest first; the cutoff branches
    /// keep the bucket's lap-number order.
    pub fn filter(&self, bucket: &[TimedLap], compound: Compound) -> Vec<TimedLap> {
        if bucket.is_empty() {
            return Vec::new();
        }

        match compound {
            Compound::Medium | Compound::Hard if bucket.len() >= self.percentile_min_laps => {
                self.percentile_trim(bucket)
            }
            Compound::Medium | Compound::Hard => {
                self.relative_cutoff(bucket, self.race_pace_tolerance)
            }
            Compound::Soft => self.relative_cutoff(bucket, self.soft_tolerance),
            Compound::Unknown => bucket.to_vec(),
        }
    }

    /// Filter every bucket of a classification pass.
    pub fn apply(&self, classified: ClassifiedLaps) -> FilteredLaps {
        let mut discarded = 0;
        let buckets: BTreeMap<BucketKey, Vec<TimedLap>> = classified
            .into_buckets()
            .into_iter()
            .map(|((driver, compound), bucket)| {
                let kept = self.filter(&bucket, compound);
                discarded += bucket.len() - kept.len();
                ((driver, compound), kept)
            })
            .collect();

        debug!(discarded, buckets = buckets.len(), "Filtered outlier laps");

        FilteredLaps { buckets, discarded }
    }

    fn percentile_trim(&self, bucket: &[TimedLap]) -> Vec<TimedLap> {
        let mut sorted = bucket.to_vec();
        sorted.sort_by(|a, b| a.lap_time.total_cmp(&b.lap_time).then(a.lap_number.cmp(&b.lap_number)));

        let keep = (sorted.len() as f64 * self.percentile_keep).floor() as usize;
        sorted.truncate(keep);
        sorted
    }

    fn relative_cutoff(&self, bucket: &[TimedLap], tolerance: f64) -> Vec<TimedLap> {
        let cutoff = self.cutoff(bucket, tolerance);
        bucket.iter().copied().filter(|lap| lap.lap_time <= cutoff).collect()
    }

    fn cutoff(&self, bucket: &[TimedLap], tolerance: f64) -> f64 {
        let fastest = bucket.iter().map(|lap| lap.lap_time).fold(f64::INFINITY, f64::min);
        (fastest * tolerance).max(self.cutoff_floor_secs)
    }
}
