//! Lap records from the timing feed

use serde::{Deserialize, Serialize};

/// One observed lap as reported by the timing feed.
///
/// Every field is optional on the wire; the classifier decides which laps
/// count. Records whose fields have the wrong type never become a
/// `LapSample` and are skipped at parse time.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LapSample {
    /// Car number of the driver
    pub driver_number: Option<u32>,
    /// Lap number within the session, starting at 1
    pub lap_number: Option<u32>,
    /// Lap duration in seconds
    pub lap_duration: Option<f64>,
    /// Lap deleted by race control (track limits, red flag)
    pub deleted: Option<bool>,
    /// First lap after leaving the pit lane
    pub is_pit_out_lap: Option<bool>,
}

impl LapSample {
    /// Create a clean lap sample.
    pub fn new(driver_number: u32, lap_number: u32, lap_duration: f64) -> Self {
        Self {
            driver_number: Some(driver_number),
            lap_number: Some(lap_number),
            lap_duration: Some(lap_duration),
            deleted: Some(false),
            is_pit_out_lap: Some(false),
        }
    }

    /// Mark this lap as a pit-out lap.
    pub fn pit_out(mut self) -> Self {
        self.is_pit_out_lap = Some(true);
        self
    }

    /// Mark this lap as deleted by the timing system.
    pub fn deleted(mut self) -> Self {
        self.deleted = Some(true);
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.unwrap_or(false)
    }

    pub fn is_pit_out(&self) -> bool {
        self.is_pit_out_lap.unwrap_or(false)
    }
}

/// A lap that survived classification: its time and where it sits in the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedLap {
    /// Lap duration in seconds
    pub lap_time: f64,
    /// Lap number within the session
    pub lap_number: u32,
}

impl TimedLap {
    pub fn new(lap_time: f64, lap_number: u32) -> Self {
        Self { lap_time, lap_number }
    }
}
