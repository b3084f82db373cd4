//! Driver roster records

use serde::{Deserialize, Serialize};

/// Team name used when the roster does not say.
pub const UNKNOWN_TEAM: &str = "Unknown";

/// Driver record as it arrives from the timing feed.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawDriver {
    /// Car number
    pub driver_number: Option<u32>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Full name as broadcast (e.g. "Max VERSTAPPEN")
    pub full_name: Option<String>,
    /// Three-letter acronym
    pub name_acronym: Option<String>,
    /// Team name
    pub team_name: Option<String>,
}

/// One rostered driver for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub driver_number: u32,
    pub first_name: String,
    pub last_name: String,
    pub team_name: String,
    pub full_name: Option<String>,
    pub acronym: Option<String>,
}

impl RosterEntry {
    pub fn new(
        driver_number: u32,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        team_name: impl Into<String>,
    ) -> Self {
        Self {
            driver_number,
            first_name: first_name.into(),
            last_name: last_name.into(),
            team_name: team_name.into(),
            full_name: None,
            acronym: None,
        }
    }

    /// Name shown in reports and used as the driver key in storage.
    ///
    /// Falls back to the broadcast full name, then to `Driver {number}`.
    pub fn display_name(&self) -> String {
        let joined = format!("{} {}", self.first_name, self.last_name);
        let joined = joined.trim();
        if !joined.is_empty() {
            return joined.to_string();
        }

        match self.full_name.as_deref().map(str::trim) {
            Some(full) if !full.is_empty() => full.to_string(),
            _ => placeholder_name(self.driver_number),
        }
    }
}

/// Display name for a driver that is missing from the roster.
pub fn placeholder_name(driver_number: u32) -> String {
    format!("Driver {}", driver_number)
}

impl TryFrom<RawDriver> for RosterEntry {
    type Error = &'static str;

    fn try_from(raw: RawDriver) -> Result<Self, Self::Error> {
        let driver_number = raw.driver_number.filter(|n| *n > 0).ok_or("missing driver_number")?;
        let team_name = raw
            .team_name
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TEAM.to_string());

        Ok(Self {
            driver_number,
            first_name: raw.first_name.unwrap_or_default(),
            last_name: raw.last_name.unwrap_or_default(),
            team_name,
            full_name: raw.full_name,
            acronym: raw.name_acronym,
        })
    }
}
