//! Summary persistence
//!
//! The pipeline hands a finished session to a [`SummarySink`] as one
//! [`SessionRecord`] plus one [`DriverRow`] per driver. Sinks must be
//! idempotent: storing the same session twice updates the stored analysis
//! instead of duplicating it.

mod schema;
mod sqlite;

pub use sqlite::{SqliteSink, StoredAnalysis, StoredSession};

use serde::Serialize;

use crate::Result;
use crate::aggregate::{DriverProfile, SessionSummary};
use crate::types::{Compound, SessionKey, SessionQuery};

/// Identity of a stored session: the event (track and year) and the session
/// within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    /// Event name, the circuit short name
    pub event_name: String,
    pub year: i32,
    pub session_name: String,
    pub session_key: SessionKey,
}

impl SessionRecord {
    pub fn new(query: &SessionQuery, session_key: SessionKey) -> Self {
        Self {
            event_name: query.track.clone(),
            year: query.year,
            session_name: query.session.clone(),
            session_key,
        }
    }
}

/// One driver's stored analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverRow {
    pub name: String,
    pub number: u32,
    pub team_name: String,
    pub fastest_soft: Option<f64>,
    pub average_medium: Option<f64>,
    pub average_hard: Option<f64>,
    /// Compound of the better race-pace average
    pub best_compound: Option<Compound>,
}

impl DriverRow {
    pub fn from_profile(profile: &DriverProfile) -> Self {
        let stats = profile.stats();
        Self {
            name: profile.name.clone(),
            number: profile.number,
            team_name: profile.team_name.clone(),
            fastest_soft: stats.fastest_soft,
            average_medium: stats.average_medium,
            average_hard: stats.average_hard,
            best_compound: stats.best_race_pace.map(|p| p.compound),
        }
    }

    /// Rows for every driver of a summary, in summary order.
    pub fn from_summary(summary: &SessionSummary) -> Vec<Self> {
        summary.drivers().map(Self::from_profile).collect()
    }
}

/// Destination for finished session summaries.
#[async_trait::async_trait]
pub trait SummarySink: Send + Sync {
    /// Store a session's rows in one unit of work.
    ///
    /// Either every row is stored or none is. Returns the store's identifier
    /// for the session.
    async fn persist_summary(&self, session: &SessionRecord, rows: &[DriverRow]) -> Result<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outlier::FilteredLaps;
    use crate::types::{RosterEntry, TimedLap};

    #[test]
    fn rows_carry_cached_statistics() {
        let roster = vec![
            RosterEntry::new(14, "Fernando", "Alonso", "Aston Martin"),
            RosterEntry::new(18, "Lance", "Stroll", "Aston Martin"),
        ];
        let mut laps = FilteredLaps::default();
        laps.buckets.insert((14, Compound::Soft), vec![TimedLap::new(66.0, 2)]);
        laps.buckets.insert((14, Compound::Medium), vec![TimedLap::new(70.0, 5), TimedLap::new(71.0, 6)]);
        laps.buckets.insert((14, Compound::Hard), vec![TimedLap::new(70.25, 12)]);

        let summary = SessionSummary::build(&roster, &laps);
        let rows = DriverRow::from_summary(&summary);

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            DriverRow {
                name: "Fernando Alonso".into(),
                number: 14,
                team_name: "Aston Martin".into(),
                fastest_soft: Some(66.0),
                average_medium: Some(70.5),
                average_hard: Some(70.25),
                best_compound: Some(Compound::Hard),
            }
        );
        assert_eq!(rows[1].fastest_soft, None);
        assert_eq!(rows[1].best_compound, None);
    }

    #[test]
    fn session_record_from_query() {
        let query = SessionQuery::new("imola", "Practice 1", 2024).unwrap();
        let record = SessionRecord::new(&query, SessionKey(9500));

        assert_eq!(record.event_name, "imola");
        assert_eq!(record.session_name, "Practice 1");
        assert_eq!(record.session_key, SessionKey(9500));
    }
}
