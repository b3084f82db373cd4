//! JSON utilities for timing API payloads
//!
//! The timing API answers list endpoints with a JSON array, but reports
//! failures (unknown session, rate limiting) as a JSON object with a
//! `detail` field. Individual records may also be malformed.
//!
//! This module turns payloads into typed records without aborting on bad rows.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{PaddockError, Result};

/// Extract the record array from an API payload.
///
/// Returns a parse error for any non-array payload, carrying the API's
/// `detail` message when present.
pub fn records_from_payload(payload: Value, context: &str) -> Result<Vec<Value>> {
    match payload {
        Value::Array(records) => Ok(records),
        Value::Object(map) => {
            let details = match map.get("detail") {
                Some(Value::String(detail)) => detail.clone(),
                Some(other) => other.to_string(),
                None => "expected a JSON array, found an object".to_string(),
            };
            Err(PaddockError::parse(context, details))
        }
        other => Err(PaddockError::parse(
            context,
            format!("expected a JSON array, found {}", type_name(&other)),
        )),
    }
}

/// Deserialize every record that fits `T`, skipping the rest.
pub fn parse_records<T>(records: Vec<Value>, context: &str) -> Vec<T>
where
    T: DeserializeOwned,
{
    let total = records.len();
    let parsed: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(value) => Some(value),
            Err(e) => {
                trace!(context, index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect();

    if parsed.len() < total {
        debug!(context, skipped = total - parsed.len(), total, "Skipped malformed records");
    }

    parsed
}

/// Deserialize raw records and convert them, skipping records that fail either step.
pub fn convert_records<R, T>(records: Vec<Value>, context: &str) -> Vec<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = &'static str>,
{
    let raw: Vec<R> = parse_records(records, context);
    let total = raw.len();
    let converted: Vec<T> = raw
        .into_iter()
        .filter_map(|record| match T::try_from(record) {
            Ok(value) => Some(value),
            Err(reason) => {
                trace!(context, reason, "Skipping incomplete record");
                None
            }
        })
        .collect();

    if converted.len() < total {
        debug!(context, skipped = total - converted.len(), total, "Skipped incomplete records");
    }

    converted
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
