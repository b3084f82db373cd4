//! Tire stint records

use serde::{Deserialize, Serialize};

use super::Compound;

/// Stint record as it arrives from the timing feed.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawStint {
    /// Car number of the driver
    pub driver_number: Option<u32>,
    /// Stint sequence number for this driver
    pub stint_number: Option<u32>,
    /// Compound label (SOFT, MEDIUM, HARD, INTERMEDIATE, WET, ...)
    pub compound: Option<String>,
    /// First lap of the stint (inclusive)
    pub lap_start: Option<u32>,
    /// Last lap of the stint (inclusive)
    pub lap_end: Option<u32>,
}

/// One tire-compound interval for one driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stint {
    pub driver_number: u32,
    pub stint_number: u32,
    pub compound: Compound,
    /// Inclusive
    pub start_lap: u32,
    /// Inclusive
    pub end_lap: u32,
}

impl Stint {
    pub fn new(
        driver_number: u32,
        stint_number: u32,
        compound: Compound,
        start_lap: u32,
        end_lap: u32,
    ) -> Self {
        Self { driver_number, stint_number, compound, start_lap, end_lap }
    }

    /// Whether `lap_number` falls inside this stint.
    pub fn covers(&self, lap_number: u32) -> bool {
        self.start_lap <= lap_number && lap_number <= self.end_lap
    }

    /// Whether the lap ranges of two stints intersect.
    pub fn overlaps(&self, other: &Stint) -> bool {
        self.start_lap <= other.end_lap && other.start_lap <= self.end_lap
    }
}

impl TryFrom<RawStint> for Stint {
    type Error = &'static str;

    fn try_from(raw: RawStint) -> Result<Self, Self::Error> {
        let driver_number = raw.driver_number.filter(|n| *n > 0).ok_or("missing driver_number")?;
        let start_lap = raw.lap_start.ok_or("missing lap_start")?;
        let end_lap = raw.lap_end.ok_or("missing lap_end")?;
        if end_lap < start_lap {
            return Err("lap_end before lap_start");
        }

        Ok(Self {
            driver_number,
            stint_number: raw.stint_number.unwrap_or(0),
            compound: Compound::from(raw.compound.as_deref()),
            start_lap,
            end_lap,
        })
    }
}
