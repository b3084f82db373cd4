//! Error types for session analysis.
//!
//! This module provides the error handling for the paddock analysis pipeline.
//! All errors implement the `std::error::Error` trait and include structured context
//! for debugging and recovery guidance.
//!
//! ## Error Categories
//!
//! - **HTTP Errors**: The timing API could not be reached or answered badly
//! - **Parse Errors**: Data format problems in API payloads or fixture files
//! - **Persistence Errors**: The SQLite store rejected a read or write
//! - **Configuration Errors**: Invalid configuration files or CLI input
//!
//! Single malformed records never surface as errors: they are skipped where
//! they are parsed. Only run-level failures reach the caller.
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use paddock::PaddockError;
//!
//! let error = PaddockError::http_failed("connection reset");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::SessionQuery;

/// Result type alias for paddock operations.
pub type Result<T, E = PaddockError> = std::result::Result<T, E>;

/// Main error type for paddock operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PaddockError {
    #[error("Timing API request failed: {reason}")]
    Http {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("No session '{session}' found at '{track}' for {year}")]
    SessionNotFound { track: String, session: String, year: i32 },

    #[error("Database operation failed: {operation}")]
    Persistence {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid configuration in {path}: {details}")]
    Config { path: PathBuf, details: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid session query: {details}")]
    InvalidQuery { details: String },
}

impl PaddockError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            PaddockError::Http { .. } => true,
            PaddockError::Persistence { source, .. } => {
                matches!(source, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_))
            }
            PaddockError::Parse { .. } => false,
            PaddockError::SessionNotFound { .. } => false,
            PaddockError::Config { .. } => false,
            PaddockError::File { .. } => false,
            PaddockError::InvalidQuery { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            PaddockError::Http { .. } => vec![
                "Check network connectivity",
                "Verify the timing API base URL",
                "Retry after a short delay",
            ],
            PaddockError::Parse { .. } => vec![
                "Check data format compatibility",
                "Verify the API has not changed its payload shape",
                "Re-export the fixture files",
            ],
            PaddockError::SessionNotFound { .. } => vec![
                "Check the track short name spelling",
                "List available tracks for the year",
                "Verify the session name (e.g. 'Practice 2')",
            ],
            PaddockError::Persistence { .. } => vec![
                "Check the database file is writable",
                "Ensure no other process holds a write lock",
                "Delete and recreate a corrupted database",
            ],
            PaddockError::Config { .. } => vec![
                "Check the configuration file syntax",
                "Remove unknown keys from the configuration",
            ],
            PaddockError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
            ],
            PaddockError::InvalidQuery { .. } => vec![
                "Provide a non-empty track and session name",
                "Provide a four-digit year",
            ],
        }
    }

    /// Helper constructor for HTTP failures.
    pub fn http_failed(reason: impl Into<String>) -> Self {
        PaddockError::Http { reason: reason.into(), source: None }
    }

    /// Helper constructor for HTTP failures with source.
    pub fn http_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        PaddockError::Http { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for parse errors.
    pub fn parse(context: impl Into<String>, details: impl Into<String>) -> Self {
        PaddockError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for database errors with the failing operation.
    pub fn persistence(operation: impl Into<String>, source: sqlx::Error) -> Self {
        PaddockError::Persistence { operation: operation.into(), source }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        PaddockError::File { path, source }
    }

    /// Helper constructor for a query that matched no session.
    pub fn session_not_found(query: &SessionQuery) -> Self {
        PaddockError::SessionNotFound {
            track: query.track.clone(),
            session: query.session.clone(),
            year: query.year,
        }
    }

    /// Helper constructor for invalid query errors.
    pub fn invalid_query(details: impl Into<String>) -> Self {
        PaddockError::InvalidQuery { details: details.into() }
    }
}

impl From<std::io::Error> for PaddockError {
    fn from(err: std::io::Error) -> Self {
        PaddockError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<sqlx::Error> for PaddockError {
    fn from(err: sqlx::Error) -> Self {
        PaddockError::Persistence { operation: "Unknown database operation".to_string(), source: err }
    }
}

impl From<reqwest::Error> for PaddockError {
    fn from(err: reqwest::Error) -> Self {
        let reason = match err.url() {
            Some(url) => format!("request to {} failed", url),
            None => "request failed".to_string(),
        };
        PaddockError::Http { reason, source: Some(Box::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn error_messages_format_correctly_with_arbitrary_context(
            reason in ".*",
            track in "\\w+",
            session in "\\w+",
            year in 2018i32..2030i32,
            details in ".*"
          ) {
            let http_error = PaddockError::http_failed(reason.clone());
            let not_found = PaddockError::SessionNotFound {
              track: track.clone(),
              session: session.clone(),
              year,
            };
            let parse_error = PaddockError::parse("laps payload", details.clone());

            let http_msg = http_error.to_string();
            prop_assert!(http_msg.contains(&reason));

            let not_found_msg = not_found.to_string();
            prop_assert!(not_found_msg.contains(&track));
            prop_assert!(not_found_msg.contains(&session));
            prop_assert!(not_found_msg.contains(&year.to_string()));

            let parse_msg = parse_error.to_string();
            prop_assert!(parse_msg.contains(&details));
            prop_assert!(parse_msg.contains("laps payload"));
          }

          #[test]
          fn error_source_chaining_preserves_base_message(
            base_message in ".*",
            reason in ".*"
          ) {
            let base: Box<dyn std::error::Error + Send + Sync> =
              Box::new(std::io::Error::other(base_message.clone()));
            let top = PaddockError::http_failed_with_source(reason, base);

            let source = std::error::Error::source(&top);
            prop_assert!(source.is_some());
            prop_assert_eq!(source.map(|s| s.to_string()), Some(base_message));
          }
        }
    }

    #[test]
    fn error_constructors_validation() {
        let file_error = PaddockError::file_error(
            PathBuf::from("/fixtures/laps.json"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(file_error, PaddockError::File { .. }));

        let http_error = PaddockError::http_failed("timeout");
        assert!(matches!(http_error, PaddockError::Http { .. }));

        let db_error = PaddockError::persistence("insert analysis", sqlx::Error::RowNotFound);
        assert!(matches!(db_error, PaddockError::Persistence { .. }));
        assert!(db_error.to_string().contains("insert analysis"));
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<PaddockError>();

        let error = PaddockError::invalid_query("empty track");
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn recovery_methods_work() {
        let http_error = PaddockError::http_failed("test");
        let parse_error = PaddockError::parse("stints", "not an array");
        let not_found = PaddockError::SessionNotFound {
            track: "monza".to_string(),
            session: "practice 1".to_string(),
            year: 2025,
        };

        assert!(http_error.is_retryable());
        assert!(!parse_error.is_retryable());
        assert!(!not_found.is_retryable());

        for error in [&http_error, &parse_error, &not_found] {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty());
            for suggestion in suggestions {
                assert!(suggestion.len() > 5);
            }
        }
    }

    #[test]
    fn from_conversions_work() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test file");
        let err: PaddockError = io_err.into();

        match err {
            PaddockError::File { source, .. } => {
                assert_eq!(source.to_string(), "test file");
            }
            _ => panic!("Expected File error variant"),
        }

        let db_err: PaddockError = sqlx::Error::RowNotFound.into();
        assert!(matches!(db_err, PaddockError::Persistence { .. }));
        assert!(!db_err.is_retryable());
    }
}
