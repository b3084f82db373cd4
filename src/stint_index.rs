//! Per-driver tire stint lookup
//!
//! Answers "which compound was driver D on during lap L?" for one session.
//! The index is built once from the stint records and never mutated.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::types::{Compound, Stint};

/// Per-driver stints ordered by start lap.
#[derive(Debug, Clone, Default)]
pub struct StintIndex {
    stints: HashMap<u32, Vec<Stint>>,
}

impl StintIndex {
    /// Build the index from an unordered set of stints.
    ///
    /// Each driver's stints are sorted by start lap, then stint number, so
    /// lookups do not depend on arrival order. Overlapping stints are kept
    /// and reported; the earliest-starting one wins lookups.
    pub fn build<I>(stints: I) -> Self
    where
        I: IntoIterator<Item = Stint>,
    {
        let mut by_driver: HashMap<u32, Vec<Stint>> = HashMap::new();
        for stint in stints {
            by_driver.entry(stint.driver_number).or_default().push(stint);
        }

        for (driver, list) in by_driver.iter_mut() {
            list.sort_by_key(|s| (s.start_lap, s.stint_number, s.end_lap));

            let overlaps = list.windows(2).filter(|pair| pair[0].overlaps(&pair[1])).count();
            if overlaps > 0 {
                warn!(
                    driver,
                    overlaps, "Overlapping stints; the earliest-starting stint wins lookups"
                );
            }
        }

        debug!(
            drivers = by_driver.len(),
            stints = by_driver.values().map(Vec::len).sum::<usize>(),
            "Built stint index"
        );

        Self { stints: by_driver }
    }

    /// Compound the driver was on for `lap_number`, or [`Compound::Unknown`].
    pub fn compound_at(&self, driver_number: u32, lap_number: u32) -> Compound {
        self.stints
            .get(&driver_number)
            .and_then(|list| list.iter().find(|stint| stint.covers(lap_number)))
            .map(|stint| stint.compound)
            .unwrap_or(Compound::Unknown)
    }

    /// Ordered stints for one driver.
    pub fn stints_for(&self, driver_number: u32) -> &[Stint] {
        self.stints.get(&driver_number).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn driver_count(&self) -> usize {
        self.stints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_stint_index() -> StintIndex {
        StintIndex::build(vec![
            Stint::new(44, 2, Compound::Hard, 11, 25),
            Stint::new(44, 1, Compound::Medium, 1, 10),
            Stint::new(1, 1, Compound::Soft, 1, 6),
        ])
    }

    #[test]
    fn lookup_finds_covering_stint() {
        let index = two_stint_index();

        assert_eq!(index.compound_at(44, 1), Compound::Medium);
        assert_eq!(index.compound_at(44, 10), Compound::Medium);
        assert_eq!(index.compound_at(44, 11), Compound::Hard);
        assert_eq!(index.compound_at(1, 6), Compound::Soft);
    }

    #[test]
    fn lookup_outside_ranges_is_unknown() {
        let index = two_stint_index();

        assert_eq!(index.compound_at(44, 26), Compound::Unknown);
        assert_eq!(index.compound_at(1, 7), Compound::Unknown);
        assert_eq!(index.compound_at(99, 1), Compound::Unknown);
    }

    #[test]
    fn stints_are_ordered_by_start_lap() {
        let index = two_stint_index();
        let starts: Vec<u32> = index.stints_for(44).iter().map(|s| s.start_lap).collect();

        assert_eq!(starts, vec![1, 11]);
        assert!(index.stints_for(99).is_empty());
        assert_eq!(index.driver_count(), 2);
    }

    #[test]
    fn overlapping_stints_resolve_to_earliest_start() {
        let index = StintIndex::build(vec![
            Stint::new(4, 2, Compound::Hard, 8, 20),
            Stint::new(4, 1, Compound::Soft, 1, 10),
        ]);

        assert_eq!(index.compound_at(4, 9), Compound::Soft);
        assert_eq!(index.compound_at(4, 11), Compound::Hard);
    }

    #[test]
    fn empty_index_answers_unknown() {
        let index = StintIndex::build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.compound_at(1, 1), Compound::Unknown);
    }

    prop_compose! {
        // Contiguous, non-overlapping stints for one driver
        fn arb_stint_plan()(
            lengths in prop::collection::vec(1u32..15, 1..6),
            compounds in prop::collection::vec(
                prop::sample::select(vec![Compound::Soft, Compound::Medium, Compound::Hard]),
                6
            ),
            gap in 0u32..3
        ) -> Vec<Stint> {
            let mut start = 1;
            lengths
                .iter()
                .enumerate()
                .map(|(i, len)| {
                    let stint = Stint::new(7, i as u32 + 1, compounds[i], start, start + len - 1);
                    start += len + gap;
                    stint
                })
                .collect()
        }
    }

    proptest! {
        #[test]
        fn prop_non_overlapping_stints_give_unique_answer(
            plan in arb_stint_plan(),
            lap in 1u32..120,
            shuffle_seed in any::<u64>()
        ) {
            let expected = plan
                .iter()
                .find(|s| s.covers(lap))
                .map(|s| s.compound)
                .unwrap_or(Compound::Unknown);

            let mut shuffled = plan.clone();
            let len = shuffled.len();
            shuffled.rotate_left((shuffle_seed as usize) % len);

            let index = StintIndex::build(shuffled);
            prop_assert_eq!(index.compound_at(7, lap), expected);
        }
    }
}
