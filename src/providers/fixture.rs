//! Fixture provider for saved or synthetic sessions
//!
//! Serves timing data without network access, either from records built in
//! memory or from a directory of saved API responses:
//!
//! ```text
//! fixture/
//!   sessions.json   session listing (required)
//!   meetings.json   meeting listing
//!   laps.json       lap records
//!   stints.json     stint records
//!   drivers.json    driver records
//! ```
//!
//! Saved records keep the API's `session_key` field and are routed to that
//! session. Records without one belong to every listed session.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::json_utils::{convert_records, parse_records, records_from_payload};
use crate::provider::{TimingProvider, find_session, track_options};
use crate::types::{
    LapSample, MeetingListing, RawDriver, RawStint, RosterEntry, SessionKey, SessionListing,
    SessionQuery, Stint, TrackOption,
};
use crate::{PaddockError, Result};

#[derive(Debug, Clone, Default)]
struct SessionData {
    laps: Vec<LapSample>,
    stints: Vec<Stint>,
    roster: Vec<RosterEntry>,
}

/// In-memory timing provider.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    listings: Vec<SessionListing>,
    meetings: Vec<MeetingListing>,
    sessions: HashMap<SessionKey, SessionData>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session to the listing under the given key.
    pub fn with_session(mut self, key: SessionKey, track: &str, session: &str, year: i32) -> Self {
        self.listings.push(SessionListing {
            session_key: Some(key.0),
            session_name: Some(session.to_string()),
            circuit_short_name: Some(track.to_string()),
            year: Some(year),
            ..Default::default()
        });
        self.sessions.entry(key).or_default();
        self
    }

    pub fn with_laps(mut self, key: SessionKey, laps: Vec<LapSample>) -> Self {
        self.sessions.entry(key).or_default().laps.extend(laps);
        self
    }

    pub fn with_stints(mut self, key: SessionKey, stints: Vec<Stint>) -> Self {
        self.sessions.entry(key).or_default().stints.extend(stints);
        self
    }

    pub fn with_roster(mut self, key: SessionKey, roster: Vec<RosterEntry>) -> Self {
        self.sessions.entry(key).or_default().roster.extend(roster);
        self
    }

    pub fn with_meetings(mut self, meetings: Vec<MeetingListing>) -> Self {
        self.meetings.extend(meetings);
        self
    }

    /// Load a saved session directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let listings: Vec<SessionListing> = match read_records(dir, "sessions.json")? {
            Some(records) => parse_records(records, "sessions.json"),
            None => {
                return Err(PaddockError::file_error(
                    dir.join("sessions.json"),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "session listing is required"),
                ));
            }
        };
        let meetings: Vec<MeetingListing> = read_records(dir, "meetings.json")?
            .map(|records| parse_records(records, "meetings.json"))
            .unwrap_or_default();
        let laps = read_records(dir, "laps.json")?.unwrap_or_default();
        let stints = read_records(dir, "stints.json")?.unwrap_or_default();
        let drivers = read_records(dir, "drivers.json")?.unwrap_or_default();

        let mut sessions = HashMap::new();
        for key in listings.iter().filter_map(|l| l.session_key).map(SessionKey) {
            let data = SessionData {
                laps: parse_records(for_session(&laps, key), "laps.json"),
                stints: convert_records::<RawStint, Stint>(for_session(&stints, key), "stints.json"),
                roster: convert_records::<RawDriver, RosterEntry>(for_session(&drivers, key), "drivers.json"),
            };
            debug!(
                session_key = %key,
                laps = data.laps.len(),
                stints = data.stints.len(),
                drivers = data.roster.len(),
                "Loaded fixture session"
            );
            sessions.insert(key, data);
        }

        info!(path = %dir.display(), sessions = sessions.len(), "Loaded fixture directory");
        Ok(Self { listings, meetings, sessions })
    }

    fn data(&self, key: SessionKey) -> Option<&SessionData> {
        let data = self.sessions.get(&key);
        if data.is_none() {
            debug!(session_key = %key, "Fixture has no data for session");
        }
        data
    }
}

fn read_records(dir: &Path, file: &str) -> Result<Option<Vec<Value>>> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|e| PaddockError::file_error(path.clone(), e))?;
    let payload: Value = serde_json::from_str(&text).map_err(|e| PaddockError::parse(file, e.to_string()))?;
    records_from_payload(payload, file).map(Some)
}

fn for_session(records: &[Value], key: SessionKey) -> Vec<Value> {
    records
        .iter()
        .filter(|record| record.get("session_key").and_then(Value::as_u64).is_none_or(|k| k == key.0))
        .cloned()
        .collect()
}

#[async_trait::async_trait]
impl TimingProvider for FixtureProvider {
    async fn resolve_session(&self, query: &SessionQuery) -> Result<Option<SessionKey>> {
        Ok(find_session(query, &self.listings))
    }

    async fn fetch_laps(&self, session: SessionKey) -> Result<Vec<LapSample>> {
        Ok(self.data(session).map(|d| d.laps.clone()).unwrap_or_default())
    }

    async fn fetch_stints(&self, session: SessionKey) -> Result<Vec<Stint>> {
        Ok(self.data(session).map(|d| d.stints.clone()).unwrap_or_default())
    }

    async fn fetch_roster(&self, session: SessionKey) -> Result<Vec<RosterEntry>> {
        Ok(self.data(session).map(|d| d.roster.clone()).unwrap_or_default())
    }

    async fn list_meetings(&self, year: i32) -> Result<Vec<TrackOption>> {
        let meetings = self.meetings.iter().filter(|m| m.year.is_none_or(|y| y == year)).cloned().collect();
        Ok(track_options(meetings, year))
    }
}
