//! Timing data providers

pub mod fixture;
pub mod openf1;

pub use fixture::FixtureProvider;
pub use openf1::OpenF1Provider;
