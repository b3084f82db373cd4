//! Core types for timing data representation.
//!
//! This module provides the records the analysis pipeline consumes and the
//! identifiers it passes between the provider and the sink.
//!
//! ## Architecture
//!
//! The types map onto the public timing API's JSON records:
//! - [`LapSample`] is one lap as reported, every field optional
//! - [`RawStint`] / [`Stint`] describe tire-compound intervals per driver
//! - [`RawDriver`] / [`RosterEntry`] describe who drove for which team
//! - [`SessionQuery`] and [`SessionKey`] identify the session under analysis
//! - [`Compound`] is the tire classification every lap is bucketed by
//!
//! Raw records with required fields missing fail their `TryFrom` conversion
//! and are dropped one at a time by the provider; they never abort a run.
//!
//! ## Usage Example
//!
//! ```rust
//! use paddock::types::{Compound, RawStint, Stint};
//!
//! let raw = RawStint {
//!     driver_number: Some(44),
//!     stint_number: Some(1),
//!     compound: Some("medium".to_string()),
//!     lap_start: Some(1),
//!     lap_end: Some(18),
//! };
//!
//! let stint = Stint::try_from(raw).unwrap();
//! assert_eq!(stint.compound, Compound::Medium);
//! assert!(stint.covers(18));
//! ```

mod compound;
mod lap;
mod roster;
mod session;
mod stint;

pub use compound::Compound;
pub use lap::{LapSample, TimedLap};
pub use roster::{RawDriver, RosterEntry, UNKNOWN_TEAM, placeholder_name};
pub use session::{MeetingListing, SessionKey, SessionListing, SessionQuery, TrackOption};
pub use stint::{RawStint, Stint};

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_compound_labels_are_case_insensitive(
            label in prop::sample::select(vec!["soft", "medium", "hard"]),
            upper_mask in prop::collection::vec(any::<bool>(), 6)
        ) {
            let mixed: String = label
                .chars()
                .zip(upper_mask.iter().cycle())
                .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
                .collect();

            let compound = Compound::from_label(&mixed);
            prop_assert!(compound.is_known());
            prop_assert_eq!(compound.label(), label.to_ascii_uppercase());
        }

        #[test]
        fn prop_unrecognised_labels_resolve_to_unknown(label in "[A-Z_]{0,12}") {
            prop_assume!(!matches!(label.as_str(), "SOFT" | "MEDIUM" | "HARD"));
            prop_assert_eq!(Compound::from_label(&label), Compound::Unknown);
        }

        #[test]
        fn prop_stint_covers_exactly_its_range(
            start in 1u32..60,
            len in 0u32..30,
            lap in 1u32..100
        ) {
            let stint = Stint::new(1, 1, Compound::Hard, start, start + len);
            prop_assert_eq!(stint.covers(lap), lap >= start && lap <= start + len);
        }
    }

    #[test]
    fn compound_labels_round_trip_through_display() {
        for compound in [Compound::Soft, Compound::Medium, Compound::Hard, Compound::Unknown] {
            assert_eq!(Compound::from_label(&compound.to_string()), compound);
        }
        assert_eq!(Compound::from_label("INTERMEDIATE"), Compound::Unknown);
        assert_eq!(Compound::from(None), Compound::Unknown);
    }

    #[test]
    fn compound_serializes_as_upper_case_label() {
        let json = serde_json::to_string(&Compound::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
    }

    #[test]
    fn lap_sample_deserializes_with_missing_fields() {
        let json = r#"{"driver_number": 1, "lap_number": 3, "lap_duration": null}"#;
        let lap: LapSample = serde_json::from_str(json).unwrap();

        assert_eq!(lap.driver_number, Some(1));
        assert_eq!(lap.lap_duration, None);
        assert!(!lap.is_deleted());
        assert!(!lap.is_pit_out());
    }

    #[test]
    fn lap_sample_rejects_wrongly_typed_fields() {
        let json = r#"{"driver_number": "one", "lap_number": 3, "lap_duration": 90.1}"#;
        assert!(serde_json::from_str::<LapSample>(json).is_err());
    }

    #[test]
    fn raw_stint_without_lap_range_is_rejected() {
        let raw = RawStint {
            driver_number: Some(16),
            stint_number: Some(2),
            compound: Some("HARD".to_string()),
            lap_start: Some(10),
            lap_end: None,
        };
        assert!(Stint::try_from(raw).is_err());

        let inverted = RawStint {
            driver_number: Some(16),
            stint_number: Some(2),
            compound: Some("HARD".to_string()),
            lap_start: Some(10),
            lap_end: Some(4),
        };
        assert!(Stint::try_from(inverted).is_err());
    }

    #[test]
    fn stint_overlap_detection() {
        let a = Stint::new(1, 1, Compound::Soft, 1, 10);
        let b = Stint::new(1, 2, Compound::Medium, 10, 20);
        let c = Stint::new(1, 3, Compound::Hard, 21, 30);

        assert!(a.overlaps(&b));
        assert!(!b.overlaps(&c));
    }

    #[test]
    fn roster_entry_defaults_team_and_builds_display_name() {
        let raw = RawDriver {
            driver_number: Some(81),
            first_name: Some("Oscar".to_string()),
            last_name: Some("Piastri".to_string()),
            team_name: None,
            ..Default::default()
        };

        let entry = RosterEntry::try_from(raw).unwrap();
        assert_eq!(entry.display_name(), "Oscar Piastri");
        assert_eq!(entry.team_name, UNKNOWN_TEAM);
    }

    #[test]
    fn roster_entry_display_name_fallbacks() {
        let mut entry = RosterEntry::new(7, "", "", "X");
        assert_eq!(entry.display_name(), "Driver 7");

        entry.full_name = Some("Jack DOOHAN".to_string());
        assert_eq!(entry.display_name(), "Jack DOOHAN");
    }

    #[test]
    fn roster_entry_requires_driver_number() {
        let raw = RawDriver { driver_number: Some(0), ..Default::default() };
        assert!(RosterEntry::try_from(raw).is_err());
    }

    #[test]
    fn session_query_validation() {
        assert!(SessionQuery::new("spielberg", "practice 2", 2025).is_ok());
        assert!(SessionQuery::new("  ", "practice 2", 2025).is_err());
        assert!(SessionQuery::new("spielberg", "", 2025).is_err());
        assert!(SessionQuery::new("spielberg", "practice 2", 25).is_err());
    }

    #[test]
    fn session_query_matches_case_insensitively() {
        let query = SessionQuery::new("Spielberg", "PRACTICE 2", 2025).unwrap();
        let listing = SessionListing {
            session_key: Some(9947),
            session_name: Some("Practice 2".to_string()),
            circuit_short_name: Some("spielberg".to_string()),
            year: Some(2025),
            ..Default::default()
        };

        assert!(query.matches(&listing));

        let other_year = SessionListing { year: Some(2024), ..listing.clone() };
        assert!(!query.matches(&other_year));
        assert!(!query.matches_track(&other_year));
    }
}
