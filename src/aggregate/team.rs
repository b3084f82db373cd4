//! Team grouping

use super::PaceSource;
use super::driver::{DriverProfile, mean};
use crate::types::Compound;

/// Drivers that share a team name within one session.
///
/// The team owns its drivers; a driver belongs to exactly one team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamProfile {
    pub name: String,
    drivers: Vec<DriverProfile>,
}

impl TeamProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), drivers: Vec::new() }
    }

    pub(crate) fn add_driver(&mut self, driver: DriverProfile) -> &mut DriverProfile {
        let at = self.drivers.len();
        self.drivers.push(driver);
        &mut self.drivers[at]
    }

    pub(crate) fn position_of(&self, number: u32) -> Option<usize> {
        self.drivers.iter().position(|d| d.number == number)
    }

    pub(crate) fn driver_at_mut(&mut self, at: usize) -> &mut DriverProfile {
        &mut self.drivers[at]
    }

    pub fn drivers(&self) -> &[DriverProfile] {
        &self.drivers
    }

    /// Mean of the member drivers' averages on `compound`.
    ///
    /// Each driver with laps on the compound counts once, however many laps
    /// they ran. This is a mean of means, not a pooled lap mean.
    pub fn average(&self, compound: Compound) -> Option<f64> {
        let averages: Vec<f64> = self.drivers.iter().filter_map(|d| d.average(compound)).collect();
        mean(&averages)
    }
}

impl PaceSource for TeamProfile {
    fn average(&self, compound: Compound) -> Option<f64> {
        TeamProfile::average(self, compound)
    }
}
