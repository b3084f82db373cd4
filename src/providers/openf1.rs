//! OpenF1 HTTP provider

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::config::PaddockConfig;
use crate::json_utils::{convert_records, parse_records, records_from_payload};
use crate::provider::{TimingProvider, find_session, track_options};
use crate::types::{
    LapSample, MeetingListing, RawDriver, RawStint, RosterEntry, SessionKey, SessionListing,
    SessionQuery, Stint, TrackOption,
};
use crate::{PaddockError, Result};

/// Provider backed by the public OpenF1 REST API.
#[derive(Debug, Clone)]
pub struct OpenF1Provider {
    client: Client,
    base_url: String,
}

impl OpenF1Provider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openf1.org/v1";

    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| PaddockError::http_failed_with_source("failed to create HTTP client", Box::new(e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &PaddockConfig) -> Result<Self> {
        Self::new(&config.api_base_url, config.request_timeout(), &config.user_agent)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str, filter: &str, value: impl std::fmt::Display) -> String {
        format!("{}/{}?{}={}", self.base_url, endpoint, filter, value)
    }

    /// GET an endpoint and return its record array.
    ///
    /// The API answers 404 with a `detail` object when a filter matches
    /// nothing; that is an empty result, not a failure.
    async fn get_records(&self, url: String, context: &str) -> Result<Vec<Value>> {
        debug!(%url, "Requesting timing records");
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(%url, "No records for filter");
            return Ok(Vec::new());
        }

        let payload: Value = response.error_for_status()?.json().await?;
        let records = records_from_payload(payload, context)?;
        debug!(context, records = records.len(), "Received timing records");
        Ok(records)
    }
}

#[async_trait::async_trait]
impl TimingProvider for OpenF1Provider {
    #[instrument(skip(self), fields(track = %query.track, session = %query.session, year = query.year))]
    async fn resolve_session(&self, query: &SessionQuery) -> Result<Option<SessionKey>> {
        let records = self.get_records(self.url("sessions", "year", query.year), "sessions").await?;
        let listings: Vec<SessionListing> = parse_records(records, "sessions");
        let key = find_session(query, &listings);
        if let Some(key) = key {
            info!(session_key = %key, "Found session");
        }
        Ok(key)
    }

    async fn fetch_laps(&self, session: SessionKey) -> Result<Vec<LapSample>> {
        let records = self.get_records(self.url("laps", "session_key", session), "laps").await?;
        Ok(parse_records(records, "laps"))
    }

    async fn fetch_stints(&self, session: SessionKey) -> Result<Vec<Stint>> {
        let records = self.get_records(self.url("stints", "session_key", session), "stints").await?;
        Ok(convert_records::<RawStint, Stint>(records, "stints"))
    }

    async fn fetch_roster(&self, session: SessionKey) -> Result<Vec<RosterEntry>> {
        let records = self.get_records(self.url("drivers", "session_key", session), "drivers").await?;
        Ok(convert_records::<RawDriver, RosterEntry>(records, "drivers"))
    }

    async fn list_meetings(&self, year: i32) -> Result<Vec<TrackOption>> {
        let records = self.get_records(self.url("meetings", "year", year), "meetings").await?;
        let meetings: Vec<MeetingListing> = parse_records(records, "meetings");
        Ok(track_options(meetings, year))
    }
}
