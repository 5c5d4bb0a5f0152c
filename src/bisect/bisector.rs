//! The bisection state machine.

use crate::types::{BoundaryPair, Version};

/// The result of feeding one verdict into a [`Bisector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BisectStep {
    /// The search continues; this candidate should be tested next.
    Continue(Version),

    /// The search is over; the regression lies between these two candidates.
    Done(BoundaryPair),
}

/// Bisection over an ordered candidate list (index 0 is the oldest).
///
/// A candidate is "good" if it does not exhibit the regression and "bad" if
/// it does. The search assumes the oldest candidate is good and the newest
/// is bad; drivers verify both boundaries once the search terminates.
#[derive(Debug, Clone)]
pub struct Bisector {
    candidates: Vec<Version>,
    min_rev: usize,
    max_rev: usize,
    pivot: usize,
}

impl Bisector {
    /// Creates a bisector over `candidates`, oldest first.
    ///
    /// `candidates` must be non-empty. Callers validate this before
    /// constructing a bisector; an empty list is a contract violation.
    pub fn new(candidates: Vec<Version>) -> Self {
        debug_assert!(!candidates.is_empty(), "bisector needs at least one candidate");
        let max_rev = candidates.len().saturating_sub(1);
        Bisector {
            candidates,
            min_rev: 0,
            max_rev,
            pivot: max_rev / 2,
        }
    }

    /// Returns the candidate currently under evaluation.
    pub fn current_version(&self) -> &Version {
        &self.candidates[self.pivot]
    }

    /// Records a verdict for the current pivot and returns the next step.
    ///
    /// `is_good` means the pivot does not exhibit the regression, so the
    /// regression was introduced after it.
    pub fn continue_with(&mut self, is_good: bool) -> BisectStep {
        let mut is_over = self.max_rev - self.min_rev <= 1;

        if is_good {
            self.min_rev = self.pivot;
            let up = self.pivot + (self.max_rev - self.pivot) / 2;
            if up != self.max_rev && up != self.pivot {
                self.pivot = up;
            } else {
                is_over = true;
            }
        } else {
            // With pivot == min the range is already minimal; collapsing would
            // report the same candidate as both boundaries.
            if self.pivot > self.min_rev {
                self.max_rev = self.pivot;
            }
            let down = self.min_rev + (self.pivot - self.min_rev) / 2;
            if down != self.min_rev && down != self.pivot {
                self.pivot = down;
            } else {
                is_over = true;
            }
        }

        if is_over {
            BisectStep::Done(self.boundary())
        } else {
            BisectStep::Continue(self.current_version().clone())
        }
    }

    /// The current `(candidates[min], candidates[max])` bracket.
    pub fn boundary(&self) -> BoundaryPair {
        BoundaryPair {
            good: self.candidates[self.min_rev].clone(),
            bad: self.candidates[self.max_rev].clone(),
        }
    }

    pub fn min_rev(&self) -> usize {
        self.min_rev
    }

    pub fn max_rev(&self) -> usize {
        self.max_rev
    }

    pub fn pivot(&self) -> usize {
        self.pivot
    }

    /// Number of candidates, including those already ruled out.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Version] {
        &self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(names: &[&str]) -> Vec<Version> {
        names.iter().map(|n| Version::from(*n)).collect()
    }

    fn nine() -> Vec<Version> {
        (1..=9).map(|i| Version::new(format!("{i}.0.0"))).collect()
    }

    #[test]
    fn initial_pivot_rounds_down() {
        assert_eq!(Bisector::new(nine()).pivot(), 4);
        assert_eq!(Bisector::new(versions(&["a", "b", "c", "d"])).pivot(), 1);
        assert_eq!(Bisector::new(versions(&["a", "b"])).pivot(), 0);
        assert_eq!(Bisector::new(versions(&["a"])).pivot(), 0);
    }

    #[test]
    fn current_version_is_idempotent() {
        let bisector = Bisector::new(nine());
        assert_eq!(bisector.current_version(), &Version::from("5.0.0"));
        assert_eq!(bisector.current_version(), &Version::from("5.0.0"));
    }

    #[test]
    fn nine_version_walkthrough() {
        let mut bisector = Bisector::new(nine());
        assert_eq!(bisector.current_version().as_str(), "5.0.0");

        let step = bisector.continue_with(false);
        assert_eq!(step, BisectStep::Continue(Version::from("3.0.0")));
        assert_eq!(bisector.pivot(), 2);

        let step = bisector.continue_with(false);
        assert_eq!(step, BisectStep::Continue(Version::from("2.0.0")));
        assert_eq!(bisector.pivot(), 1);

        let step = bisector.continue_with(true);
        assert_eq!(step, BisectStep::Done(BoundaryPair::new("2.0.0", "3.0.0")));
        assert_eq!((bisector.min_rev(), bisector.max_rev()), (1, 2));
    }

    #[test]
    fn two_candidates_terminate_on_good() {
        let mut bisector = Bisector::new(versions(&["a", "b"]));
        assert_eq!(
            bisector.continue_with(true),
            BisectStep::Done(BoundaryPair::new("a", "b"))
        );
    }

    #[test]
    fn two_candidates_terminate_on_bad() {
        let mut bisector = Bisector::new(versions(&["a", "b"]));
        assert_eq!(
            bisector.continue_with(false),
            BisectStep::Done(BoundaryPair::new("a", "b"))
        );
    }

    #[test]
    fn three_candidates() {
        let mut good = Bisector::new(versions(&["a", "b", "c"]));
        assert_eq!(good.current_version().as_str(), "b");
        assert_eq!(
            good.continue_with(true),
            BisectStep::Done(BoundaryPair::new("b", "c"))
        );

        let mut bad = Bisector::new(versions(&["a", "b", "c"]));
        assert_eq!(
            bad.continue_with(false),
            BisectStep::Done(BoundaryPair::new("a", "b"))
        );
    }

    #[test]
    fn four_candidates() {
        let names = ["a", "b", "c", "d"];

        let mut bisector = Bisector::new(versions(&names));
        assert_eq!(bisector.continue_with(true), BisectStep::Continue("c".into()));
        assert_eq!(
            bisector.continue_with(true),
            BisectStep::Done(BoundaryPair::new("c", "d"))
        );

        let mut bisector = Bisector::new(versions(&names));
        assert_eq!(bisector.continue_with(true), BisectStep::Continue("c".into()));
        assert_eq!(
            bisector.continue_with(false),
            BisectStep::Done(BoundaryPair::new("b", "c"))
        );

        let mut bisector = Bisector::new(versions(&names));
        assert_eq!(
            bisector.continue_with(false),
            BisectStep::Done(BoundaryPair::new("a", "b"))
        );
    }

    #[test]
    fn single_candidate_terminates_with_itself() {
        let mut bisector = Bisector::new(versions(&["only"]));
        assert_eq!(bisector.current_version().as_str(), "only");
        assert_eq!(
            bisector.continue_with(false),
            BisectStep::Done(BoundaryPair::new("only", "only"))
        );
    }

    #[test]
    fn all_good_converges_on_newest_pair() {
        let mut bisector = Bisector::new(nine());
        let pair = loop {
            if let BisectStep::Done(pair) = bisector.continue_with(true) {
                break pair;
            }
        };
        assert_eq!(pair, BoundaryPair::new("8.0.0", "9.0.0"));
    }

    #[test]
    fn all_bad_converges_on_oldest_pair() {
        let mut bisector = Bisector::new(nine());
        let pair = loop {
            if let BisectStep::Done(pair) = bisector.continue_with(false) {
                break pair;
            }
        };
        assert_eq!(pair, BoundaryPair::new("1.0.0", "2.0.0"));
    }
}
