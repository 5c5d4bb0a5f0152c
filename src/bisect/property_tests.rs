//! Property-based tests for the bisector.
//!
//! **Property 1**: The pivot stays within `[min, max]` and names the current version
//! **Property 2**: `max - min` strictly shrinks until termination
//! **Property 3**: A terminal pair is `(candidates[min], candidates[max])`
//! **Property 4**: Two candidates terminate on the first verdict
//! **Property**: A monotone oracle is localized to the exact adjacent pair

use proptest::prelude::*;

use super::{BisectStep, Bisector};
use crate::test_utils::arb_versions;
use crate::types::BoundaryPair;

fn check_invariants(bisector: &Bisector) -> Result<(), TestCaseError> {
    prop_assert!(bisector.min_rev() <= bisector.pivot());
    prop_assert!(bisector.pivot() <= bisector.max_rev());
    prop_assert!(bisector.max_rev() < bisector.len());
    prop_assert_eq!(
        bisector.current_version(),
        &bisector.candidates()[bisector.pivot()]
    );
    Ok(())
}

proptest! {
    #[test]
    fn pivot_stays_in_range_and_range_shrinks(
        candidates in arb_versions(1..64),
        verdicts in prop::collection::vec(any::<bool>(), 64),
    ) {
        let mut bisector = Bisector::new(candidates);
        check_invariants(&bisector)?;

        let mut seen_pivots = vec![bisector.pivot()];
        let mut terminated = false;

        for is_good in verdicts {
            let (old_min, old_max) = (bisector.min_rev(), bisector.max_rev());
            let step = bisector.continue_with(is_good);

            prop_assert!(bisector.min_rev() >= old_min);
            prop_assert!(bisector.max_rev() <= old_max);

            match step {
                BisectStep::Continue(version) => {
                    check_invariants(&bisector)?;
                    prop_assert_eq!(&version, bisector.current_version());
                    prop_assert!(bisector.max_rev() - bisector.min_rev() < old_max - old_min);
                    prop_assert!(!seen_pivots.contains(&bisector.pivot()));
                    seen_pivots.push(bisector.pivot());
                }
                BisectStep::Done(pair) => {
                    let expected = BoundaryPair {
                        good: bisector.candidates()[bisector.min_rev()].clone(),
                        bad: bisector.candidates()[bisector.max_rev()].clone(),
                    };
                    prop_assert_eq!(pair, expected);
                    prop_assert!(bisector.max_rev() - bisector.min_rev() <= 1);
                    terminated = true;
                    break;
                }
            }
        }

        // 64 verdicts are more than enough for 64 candidates.
        prop_assert!(terminated);
    }

    #[test]
    fn two_candidates_terminate_immediately(
        candidates in arb_versions(2..3),
        is_good in any::<bool>(),
    ) {
        let mut bisector = Bisector::new(candidates.clone());
        let step = bisector.continue_with(is_good);
        prop_assert_eq!(
            step,
            BisectStep::Done(BoundaryPair {
                good: candidates[0].clone(),
                bad: candidates[1].clone(),
            })
        );
    }

    #[test]
    fn monotone_oracle_is_localized_exactly(
        (candidates, first_bad) in arb_versions(2..64)
            .prop_flat_map(|c| {
                let len = c.len();
                (Just(c), 1..len)
            }),
    ) {
        let mut bisector = Bisector::new(candidates.clone());
        let mut steps = 0;
        let pair = loop {
            steps += 1;
            prop_assert!(steps <= candidates.len());
            let is_good = bisector.pivot() < first_bad;
            if let BisectStep::Done(pair) = bisector.continue_with(is_good) {
                break pair;
            }
        };

        prop_assert_eq!(&pair.good, &candidates[first_bad - 1]);
        prop_assert_eq!(&pair.bad, &candidates[first_bad]);
    }
}
