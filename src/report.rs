//! Human-readable session report
//!
//! ```text
//! Summary for Practice 2 at Spielberg, 2024
//! ------------------------------------------------------------
//!
//! Fastest Soft Tire Performance
//! ------------------------------------------------------------
//! Max Verstappen (#1)
//!     Fastest Lap (SOFT): 1:05.123
//!
//! Fastest Race Pace Performance
//! ------------------------------------------------------------
//! Max Verstappen (#1)
//!     AVG RACE PACE (MEDIUM): 1:09.870
//!
//! --- Team Race Pace Averages (MEDIUM/HARD) ---
//! Red Bull Racing: 1:09.870 (MEDIUM)
//! ```

use std::fmt;

use crate::aggregate::{DriverProfile, RacePace, SessionSummary, best_race_pace};
use crate::types::{Compound, SessionQuery};

const RULE_WIDTH: usize = 60;

/// Format seconds as `M:SS.mmm`; `None` renders as `N/A`.
///
/// ```rust
/// use paddock::report::format_time;
///
/// assert_eq!(format_time(Some(65.4321)), "1:05.432");
/// assert_eq!(format_time(Some(59.0)), "0:59.000");
/// assert_eq!(format_time(None), "N/A");
/// ```
pub fn format_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(secs) if secs.is_finite() => {
            // Round once so 59.9996 carries into the minute.
            let ms = (secs * 1000.0).round() as i64;
            format!("{}:{:02}.{:03}", ms / 60_000, (ms % 60_000) / 1000, ms % 1000)
        }
        _ => "N/A".to_string(),
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so `"o'neil"` becomes
/// `"O'Neil"` and `"red bull racing"` becomes `"Red Bull Racing"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Text report for one analyzed session.
///
/// Rendering goes through [`fmt::Display`].
pub struct SessionReport<'a> {
    query: &'a SessionQuery,
    summary: &'a SessionSummary,
}

impl<'a> SessionReport<'a> {
    pub fn new(query: &'a SessionQuery, summary: &'a SessionSummary) -> Self {
        Self { query, summary }
    }

    /// Drivers with a SOFT lap, fastest first.
    pub fn soft_ranking(&self) -> Vec<(&'a DriverProfile, f64)> {
        let mut ranking: Vec<_> =
            self.summary.drivers().filter_map(|d| d.stats().fastest_soft.map(|t| (d, t))).collect();
        ranking.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranking
    }

    /// Drivers with a MEDIUM or HARD average, fastest first.
    pub fn race_pace_ranking(&self) -> Vec<(&'a DriverProfile, RacePace)> {
        let mut ranking: Vec<_> =
            self.summary.drivers().filter_map(|d| d.stats().best_race_pace.map(|p| (d, p))).collect();
        ranking.sort_by(|a, b| a.1.time.total_cmp(&b.1.time));
        ranking
    }

    /// Teams with a MEDIUM or HARD average, fastest first.
    pub fn team_ranking(&self) -> Vec<(&'a str, RacePace)> {
        let mut ranking: Vec<_> = self
            .summary
            .teams()
            .iter()
            .filter_map(|t| best_race_pace(t).map(|p| (t.name.as_str(), p)))
            .collect();
        ranking.sort_by(|a, b| a.1.time.total_cmp(&b.1.time));
        ranking
    }
}

fn rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

impl fmt::Display for SessionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Summary for {} at {}, {}",
            title_case(&self.query.session),
            title_case(&self.query.track),
            self.query.year
        )?;
        rule(f)?;

        writeln!(f)?;
        writeln!(f, "Fastest Soft Tire Performance")?;
        rule(f)?;
        for (driver, time) in self.soft_ranking() {
            writeln!(f, "{} (#{})", driver.name, driver.number)?;
            writeln!(f, "    Fastest Lap ({}): {}", Compound::Soft, format_time(Some(time)))?;
        }

        writeln!(f)?;
        writeln!(f, "Fastest Race Pace Performance")?;
        rule(f)?;
        for (driver, pace) in self.race_pace_ranking() {
            writeln!(f, "{} (#{})", driver.name, driver.number)?;
            writeln!(f, "    AVG RACE PACE ({}): {}", pace.compound, format_time(Some(pace.time)))?;
        }

        writeln!(f)?;
        writeln!(f, "--- Team Race Pace Averages (MEDIUM/HARD) ---")?;
        for (team, pace) in self.team_ranking() {
            writeln!(f, "{}: {} ({})", team, format_time(Some(pace.time)), pace.compound)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outlier::FilteredLaps;
    use crate::types::{RosterEntry, TimedLap};

    fn summary() -> SessionSummary {
        let roster = vec![
            RosterEntry::new(1, "Max", "Verstappen", "Red Bull Racing"),
            RosterEntry::new(4, "Lando", "Norris", "McLaren"),
            RosterEntry::new(81, "Oscar", "Piastri", "McLaren"),
        ];
        let mut laps = FilteredLaps::default();
        laps.buckets.insert((1, Compound::Soft), vec![TimedLap::new(65.5, 3)]);
        laps.buckets.insert((4, Compound::Soft), vec![TimedLap::new(65.25, 4)]);
        laps.buckets.insert((1, Compound::Medium), vec![TimedLap::new(70.0, 10)]);
        laps.buckets.insert((4, Compound::Hard), vec![TimedLap::new(71.0, 12)]);
        laps.buckets.insert((81, Compound::Medium), vec![TimedLap::new(69.0, 9)]);
        SessionSummary::build(&roster, &laps)
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(Some(85.5)), "1:25.500");
        assert_eq!(format_time(Some(125.007)), "2:05.007");
        assert_eq!(format_time(Some(0.0)), "0:00.000");
        assert_eq!(format_time(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn time_formatting_carries_rounded_seconds() {
        assert_eq!(format_time(Some(119.9996)), "2:00.000");
        assert_eq!(format_time(Some(59.99951)), "1:00.000");
        assert_eq!(format_time(Some(59.9994)), "0:59.999");
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("practice 2"), "Practice 2");
        assert_eq!(title_case("SPA-francorchamps"), "Spa-Francorchamps");
        assert_eq!(title_case("  red bull racing "), "  Red Bull Racing ");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn rankings_are_ascending() {
        let summary = summary();
        let query = SessionQuery::new("spielberg", "practice 2", 2024).unwrap();
        let report = SessionReport::new(&query, &summary);

        let soft: Vec<u32> = report.soft_ranking().iter().map(|(d, _)| d.number).collect();
        assert_eq!(soft, vec![4, 1]);

        let pace: Vec<u32> = report.race_pace_ranking().iter().map(|(d, _)| d.number).collect();
        assert_eq!(pace, vec![81, 1, 4]);

        let teams: Vec<&str> = report.team_ranking().iter().map(|(t, _)| *t).collect();
        // McLaren: mean(69.0 MEDIUM) beats Red Bull's 70.0
        assert_eq!(teams, vec!["McLaren", "Red Bull Racing"]);
    }

    #[test]
    fn renders_all_sections() {
        let summary = summary();
        let query = SessionQuery::new("spielberg", "practice 2", 2024).unwrap();
        let text = SessionReport::new(&query, &summary).to_string();

        assert!(text.starts_with("Summary for Practice 2 at Spielberg, 2024\n"));
        assert!(text.contains("Lando Norris (#4)\n    Fastest Lap (SOFT): 1:05.250\n"));
        assert!(text.contains("Oscar Piastri (#81)\n    AVG RACE PACE (MEDIUM): 1:09.000\n"));
        assert!(text.contains("Lando Norris (#4)\n    AVG RACE PACE (HARD): 1:11.000\n"));
        assert!(text.contains("McLaren: 1:09.000 (MEDIUM)\n"));
        assert!(text.contains("Red Bull Racing: 1:10.000 (MEDIUM)\n"));

        let soft_at = text.find("Fastest Soft Tire Performance").unwrap();
        let pace_at = text.find("Fastest Race Pace Performance").unwrap();
        let team_at = text.find("--- Team Race Pace Averages (MEDIUM/HARD) ---").unwrap();
        assert!(soft_at < pace_at && pace_at < team_at);
    }

    #[test]
    fn empty_summary_renders_headers_only() {
        let summary = SessionSummary::default();
        let query = SessionQuery::new("monza", "race", 2023).unwrap();
        let text = SessionReport::new(&query, &summary).to_string();

        assert!(text.contains("Fastest Soft Tire Performance"));
        assert!(!text.contains("(#"));
    }
}
