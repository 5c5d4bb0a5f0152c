//! Bisection search over an ordered candidate list.
//!
//! The `Bisector` is a pure value: it holds the candidates and a shrinking
//! `[min, max]` index range with a pivot, and it never performs I/O. Drivers
//! (the unattended `autobisect` loop, the interactive `session`) own one per
//! search and feed it verdicts.
//!
//! # Key Invariants
//!
//! 1. **Pivot in range**: `min <= pivot <= max` whenever a step is handed out.
//!
//! 2. **Monotonic shrink**: `max - min` strictly decreases with every verdict
//!    until the search terminates. A pivot is never visited twice.
//!
//! 3. **Ordered boundary**: a finished search reports
//!    `(candidates[min], candidates[max])`, good boundary first.

pub mod bisector;

#[cfg(test)]
mod property_tests;

pub use bisector::{BisectStep, Bisector};
