//! Session lookup types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PaddockError, Result};

/// Opaque session identifier issued by the timing API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(pub u64);

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the user asked to analyze: a track, a session type and a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionQuery {
    /// Circuit short name (e.g. "spielberg")
    pub track: String,
    /// Session name (e.g. "practice 2")
    pub session: String,
    pub year: i32,
}

impl SessionQuery {
    /// Build a query, rejecting blank names and implausible years.
    pub fn new(track: impl Into<String>, session: impl Into<String>, year: i32) -> Result<Self> {
        let track = track.into().trim().to_string();
        let session = session.into().trim().to_string();

        if track.is_empty() {
            return Err(PaddockError::invalid_query("track name is empty"));
        }
        if session.is_empty() {
            return Err(PaddockError::invalid_query("session name is empty"));
        }
        if !(1950..=9999).contains(&year) {
            return Err(PaddockError::invalid_query(format!("year {} is out of range", year)));
        }

        Ok(Self { track, session, year })
    }

    /// Case-insensitive match against a session listing entry.
    pub fn matches(&self, entry: &SessionListing) -> bool {
        self.matches_track(entry)
            && entry
                .session_name
                .as_deref()
                .is_some_and(|name| name.trim().eq_ignore_ascii_case(&self.session))
    }

    /// Case-insensitive track match with an exact year.
    pub fn matches_track(&self, entry: &SessionListing) -> bool {
        entry.year == Some(self.year)
            && entry
                .circuit_short_name
                .as_deref()
                .is_some_and(|name| name.trim().eq_ignore_ascii_case(&self.track))
    }
}

/// One entry of the timing API's session listing.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionListing {
    pub session_key: Option<u64>,
    pub session_name: Option<String>,
    pub circuit_short_name: Option<String>,
    pub country_name: Option<String>,
    pub year: Option<i32>,
    pub meeting_key: Option<u64>,
}

/// One entry of the timing API's meeting listing.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeetingListing {
    pub meeting_key: Option<u64>,
    pub meeting_name: Option<String>,
    pub circuit_short_name: Option<String>,
    pub country_name: Option<String>,
    pub year: Option<i32>,
}

/// A selectable track for a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackOption {
    pub name: String,
    pub country: String,
    pub year: i32,
}

impl fmt::Display for TrackOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.country, self.year)
    }
}
