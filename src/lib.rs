//! Fiddle Bisect - find the build that introduced a regression.
//!
//! This library provides the bisection search over an ordered list of
//! candidate versions, and an unattended driver that runs a test oracle
//! against each pivot until the regression is bracketed by a last-good /
//! first-bad pair.

pub mod autobisect;
pub mod bisect;
pub mod config;
pub mod narration;
pub mod oracle;
pub mod range;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_utils;
