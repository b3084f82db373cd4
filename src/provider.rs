//! Provider trait for timing data sources

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::Result;
use crate::types::{
    LapSample, MeetingListing, RosterEntry, SessionKey, SessionListing, SessionQuery, Stint,
    TrackOption,
};

/// Trait for timing data sources
///
/// Providers abstract over where a session's records come from (the public
/// HTTP API, a saved fixture on disk, records built in memory). Records are
/// returned unordered; malformed ones are dropped by the provider one at a
/// time and never fail the call.
#[async_trait::async_trait]
pub trait TimingProvider: Send + Sync {
    /// Resolve a track, session name and year to the source's session key
    ///
    /// Returns:
    /// - `Ok(Some(key))` - Session found
    /// - `Ok(None)` - No such track or session for that year
    /// - `Err(e)` - The listing could not be retrieved
    async fn resolve_session(&self, query: &SessionQuery) -> Result<Option<SessionKey>>;

    /// Every lap record of the session
    async fn fetch_laps(&self, session: SessionKey) -> Result<Vec<LapSample>>;

    /// Every tire stint of the session
    async fn fetch_stints(&self, session: SessionKey) -> Result<Vec<Stint>>;

    /// Drivers and teams taking part in the session
    async fn fetch_roster(&self, session: SessionKey) -> Result<Vec<RosterEntry>>;

    /// Distinct tracks raced in `year`
    async fn list_meetings(&self, year: i32) -> Result<Vec<TrackOption>>;
}

/// Find the session matching `query` in a session listing.
///
/// Logs whether the track itself or only the session was missing.
pub fn find_session(query: &SessionQuery, listings: &[SessionListing]) -> Option<SessionKey> {
    let mut track_seen = false;
    for entry in listings {
        if !query.matches_track(entry) {
            continue;
        }
        track_seen = true;
        if query.matches(entry) {
            if let Some(key) = entry.session_key {
                debug!(session_key = key, "Resolved session");
                return Some(SessionKey(key));
            }
        }
    }

    if track_seen {
        warn!(track = %query.track, session = %query.session, "Session not found at track");
    } else {
        warn!(track = %query.track, year = query.year, "Track not found for year");
    }
    None
}

/// Collapse a meeting listing into distinct (track, year) options.
///
/// Keeps first-seen order. Meetings without a circuit name are skipped; a
/// missing country becomes "Unknown".
pub fn track_options(meetings: Vec<MeetingListing>, year: i32) -> Vec<TrackOption> {
    let mut seen = HashSet::new();
    meetings
        .into_iter()
        .filter_map(|meeting| {
            let name = meeting.circuit_short_name?.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let year = meeting.year.unwrap_or(year);
            if !seen.insert((name.to_lowercase(), year)) {
                return None;
            }
            let country = meeting
                .country_name
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Unknown".to_string());
            Some(TrackOption { name, country, year })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(key: u64, session: &str, track: &str, year: i32) -> SessionListing {
        SessionListing {
            session_key: Some(key),
            session_name: Some(session.into()),
            circuit_short_name: Some(track.into()),
            year: Some(year),
            ..Default::default()
        }
    }

    fn listings() -> Vec<SessionListing> {
        vec![
            listing(9100, "Practice 1", "Spielberg", 2023),
            listing(9500, "Practice 1", "Spielberg", 2024),
            listing(9501, "Practice 2", "Spielberg", 2024),
            listing(9600, "Race", "Silverstone", 2024),
        ]
    }

    #[test]
    fn resolves_case_insensitively_with_exact_year() {
        let query = SessionQuery::new("spielberg", "PRACTICE 2", 2024).unwrap();
        assert_eq!(find_session(&query, &listings()), Some(SessionKey(9501)));

        let query = SessionQuery::new("Spielberg", "practice 1", 2023).unwrap();
        assert_eq!(find_session(&query, &listings()), Some(SessionKey(9100)));
    }

    #[test]
    fn missing_track_or_session_resolves_to_none() {
        let no_track = SessionQuery::new("monza", "Race", 2024).unwrap();
        assert_eq!(find_session(&no_track, &listings()), None);

        let no_session = SessionQuery::new("silverstone", "Sprint", 2024).unwrap();
        assert_eq!(find_session(&no_session, &listings()), None);

        let wrong_year = SessionQuery::new("silverstone", "Race", 2022).unwrap();
        assert_eq!(find_session(&wrong_year, &listings()), None);
    }

    #[test]
    fn listing_without_key_is_not_a_match() {
        let mut entries = listings();
        entries.insert(0, SessionListing { session_key: None, ..listing(0, "Race", "Monza", 2024) });
        let query = SessionQuery::new("monza", "race", 2024).unwrap();
        assert_eq!(find_session(&query, &entries), None);
    }

    #[test]
    fn track_options_are_distinct_per_year() {
        let meeting = |track: Option<&str>, country: Option<&str>| MeetingListing {
            circuit_short_name: track.map(str::to_string),
            country_name: country.map(str::to_string),
            year: Some(2024),
            ..Default::default()
        };
        let meetings = vec![
            meeting(Some("Sakhir"), Some("Bahrain")),
            meeting(Some("Sakhir"), Some("Bahrain")),
            meeting(Some("Jeddah"), None),
            meeting(None, Some("Nowhere")),
            meeting(Some("sakhir"), Some("Bahrain")),
        ];

        let options = track_options(meetings, 2024);

        assert_eq!(
            options,
            vec![
                TrackOption { name: "Sakhir".into(), country: "Bahrain".into(), year: 2024 },
                TrackOption { name: "Jeddah".into(), country: "Unknown".into(), year: 2024 },
            ]
        );
        assert_eq!(options[1].to_string(), "Jeddah (Unknown, 2024)");
    }
}
