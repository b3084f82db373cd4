//! Lap classification and race-pace analysis for open motorsport timing data.
//!
//! Paddock takes one session's lap times, tire stints and driver roster from a
//! public timing API, works out which compound every lap was driven on,
//! throws away laps that say nothing about tire pace, and summarizes what is
//! left per driver and per team.
//!
//! # Pipeline
//!
//! 1. [`StintIndex`]: which compound was driver D on during lap L
//! 2. [`classify`]: drop pit-out, deleted and untimed laps; bucket the rest by
//!    (driver, compound)
//! 3. [`OutlierPolicy`]: compound-aware trimming of traffic and cool-down laps
//! 4. [`SessionSummary`]: driver and team profiles with fastest SOFT lap and
//!    MEDIUM / HARD race-pace averages
//! 5. [`SessionReport`] and [`SummarySink`]: text report and durable storage
//!
//! [`SessionAnalyzer`] drives all five against a [`TimingProvider`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use paddock::{OpenF1Provider, PaddockConfig, RunContext, SessionAnalyzer, SessionQuery};
//!
//! #[tokio::main]
//! async fn main() -> paddock::Result<()> {
//!     let provider = OpenF1Provider::from_config(&PaddockConfig::default())?;
//!     let analyzer = SessionAnalyzer::new(Arc::new(provider));
//!
//!     let query = SessionQuery::new("spielberg", "practice 2", 2024)?;
//!     let ctx = RunContext::new(query);
//!     let run = analyzer.run(&ctx).await?.into_result(ctx.query())?;
//!     println!("{}", run.report(ctx.query()));
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
mod json_utils;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Analysis pipeline
pub mod aggregate;
pub mod classifier;
pub mod outlier;
pub mod stint_index;

// Collaborators and I/O
pub mod config;
pub mod persistence;
pub mod provider;
pub mod providers;
pub mod report;
pub mod session;

// Core exports
pub use error::*;
pub use types::*;

pub use aggregate::{DriverProfile, DriverStats, PaceSource, RacePace, SessionSummary, TeamProfile, best_race_pace};
pub use classifier::{ClassifiedLaps, ClassifyStats, classify};
pub use outlier::{FilteredLaps, OutlierPolicy};
pub use stint_index::StintIndex;

pub use config::PaddockConfig;
pub use persistence::{DriverRow, SessionRecord, SqliteSink, SummarySink};
pub use provider::TimingProvider;
pub use providers::{FixtureProvider, OpenF1Provider};
pub use report::{SessionReport, format_time};
pub use session::{RunContext, RunOutcome, SessionAnalyzer, SessionRun};
