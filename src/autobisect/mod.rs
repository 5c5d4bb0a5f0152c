//! Unattended bisection.
//!
//! The driver wraps a [`Bisector`](crate::bisect::Bisector) with an
//! execute-and-classify step: it asks an [`Oracle`](crate::oracle::Oracle)
//! about each pivot, feeds the verdict back, and finally checks both boundary
//! candidates before reporting.
//!
//! # Key Invariants
//!
//! 1. **One run per candidate**: results are memoized for the whole session,
//!    so a pivot that later becomes a boundary is never run twice.
//!
//! 2. **Invalid poisons**: the first `Invalid` result (or oracle error, or
//!    cancellation) ends the session. Bisecting on an indeterminate signal
//!    would produce a meaningless boundary.
//!
//! 3. **Informative boundary**: if both boundaries give the same result the
//!    regression is not in the range, and the session reports `Invalid`.
//!
//! 4. **Running flag**: `is_running()` is true exactly while `run` is in
//!    progress, including on panics and when the future is dropped.

pub mod driver;
pub mod report;


pub use driver::{Autobisect, RunningGuard};
pub use report::{BisectReport, InvalidReason};
