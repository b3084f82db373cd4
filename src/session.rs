//! Session analysis runs
//!
//! A run resolves a session, fetches its records, pushes them through the
//! stint index, classifier, outlier filter and aggregator, and optionally
//! stores the result:
//!
//! ```text
//! resolve -> fetch -> classify -> filter -> aggregate -> persist
//! ```
//!
//! Failed fetches degrade to empty record sets with a warning, so a session
//! with no stint data still produces a (compound-less) summary. A failed
//! store write fails the run.

use std::sync::Arc;
use tracing::{Instrument, Span, info, info_span, warn};

use crate::aggregate::SessionSummary;
use crate::classifier::{ClassifyStats, classify};
use crate::outlier::OutlierPolicy;
use crate::persistence::{DriverRow, SessionRecord, SummarySink};
use crate::provider::TimingProvider;
use crate::report::SessionReport;
use crate::stint_index::StintIndex;
use crate::types::{SessionKey, SessionQuery};
use crate::{PaddockError, Result};

/// Per-run context: the query being analyzed and the tracing span every
/// stage logs under.
#[derive(Debug, Clone)]
pub struct RunContext {
    query: SessionQuery,
    span: Span,
}

impl RunContext {
    pub fn new(query: SessionQuery) -> Self {
        let span = info_span!(
            "session_run",
            track = %query.track,
            session = %query.session,
            year = query.year
        );
        Self { query, span }
    }

    pub fn query(&self) -> &SessionQuery {
        &self.query
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

/// Result of an analyzed session.
#[derive(Debug, Clone)]
pub struct SessionRun {
    pub session_key: SessionKey,
    pub summary: SessionSummary,
    pub classify_stats: ClassifyStats,
    /// Laps dropped by the outlier filter
    pub discarded_laps: usize,
    /// Store identifier when the summary was persisted
    pub stored_session_id: Option<i64>,
}

impl SessionRun {
    pub fn report<'a>(&'a self, query: &'a SessionQuery) -> SessionReport<'a> {
        SessionReport::new(query, &self.summary)
    }
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No session matched the query; nothing was fetched or stored.
    SessionNotFound,
    Completed(SessionRun),
}

impl RunOutcome {
    pub fn completed(&self) -> Option<&SessionRun> {
        match self {
            RunOutcome::Completed(run) => Some(run),
            RunOutcome::SessionNotFound => None,
        }
    }

    /// Turn a missing session into [`PaddockError::SessionNotFound`] for `query`.
    pub fn into_result(self, query: &SessionQuery) -> Result<SessionRun> {
        match self {
            RunOutcome::Completed(run) => Ok(run),
            RunOutcome::SessionNotFound => Err(PaddockError::session_not_found(query)),
        }
    }
}

/// Drives the analysis pipeline against a provider and an optional sink.
#[derive(Clone)]
pub struct SessionAnalyzer {
    provider: Arc<dyn TimingProvider>,
    sink: Option<Arc<dyn SummarySink>>,
    policy: OutlierPolicy,
}

impl SessionAnalyzer {
    pub fn new(provider: Arc<dyn TimingProvider>) -> Self {
        Self { provider, sink: None, policy: OutlierPolicy::default() }
    }

    /// Store every completed run in `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn SummarySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_policy(mut self, policy: OutlierPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn provider(&self) -> &dyn TimingProvider {
        self.provider.as_ref()
    }

    pub async fn run(&self, ctx: &RunContext) -> Result<RunOutcome> {
        self.run_inner(ctx.query()).instrument(ctx.span().clone()).await
    }

    async fn run_inner(&self, query: &SessionQuery) -> Result<RunOutcome> {
        info!("Resolving session");
        let Some(key) = self.provider.resolve_session(query).await? else {
            warn!("No matching session; skipping analysis");
            return Ok(RunOutcome::SessionNotFound);
        };

        let laps = degrade(self.provider.fetch_laps(key).await, "laps");
        let stints = degrade(self.provider.fetch_stints(key).await, "stints");
        let roster = degrade(self.provider.fetch_roster(key).await, "drivers");
        info!(
            session_key = %key,
            laps = laps.len(),
            stints = stints.len(),
            drivers = roster.len(),
            "Fetched session records"
        );

        let index = StintIndex::build(stints);
        let classified = classify(&laps, &index);
        let classify_stats = classified.stats();
        let filtered = self.policy.apply(classified);
        let discarded_laps = filtered.discarded;
        let summary = SessionSummary::build(&roster, &filtered);

        info!(
            kept = classify_stats.kept,
            excluded = classify_stats.excluded(),
            pit_out = classify_stats.pit_out,
            deleted = classify_stats.deleted,
            unknown_compound = classify_stats.unknown_compound,
            discarded = discarded_laps,
            drivers = summary.driver_count(),
            teams = summary.teams().len(),
            "Analyzed session"
        );

        let stored_session_id = match &self.sink {
            Some(sink) => {
                let record = SessionRecord::new(query, key);
                let rows = DriverRow::from_summary(&summary);
                Some(sink.persist_summary(&record, &rows).await?)
            }
            None => None,
        };

        Ok(RunOutcome::Completed(SessionRun {
            session_key: key,
            summary,
            classify_stats,
            discarded_laps,
            stored_session_id,
        }))
    }
}

fn degrade<T>(fetched: Result<Vec<T>>, what: &str) -> Vec<T> {
    match fetched {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, records = what, "Fetch failed; continuing without these records");
            Vec::new()
        }
    }
}
