//! Shared test utilities and arbitrary generators for property-based testing.

use std::ops::Range;

use crate::types::{RunResult, Version};
use proptest::prelude::*;

/// Generates a list of distinct versions, oldest first.
pub fn arb_versions(len: Range<usize>) -> impl Strategy<Value = Vec<Version>> {
    ("[a-z]{0,3}", len).prop_map(|(prefix, n)| {
        (0..n)
            .map(|i| Version::new(format!("{prefix}{}.0.0", i + 1)))
            .collect()
    })
}

pub fn arb_run_result() -> impl Strategy<Value = RunResult> {
    prop_oneof![
        Just(RunResult::Success),
        Just(RunResult::Failure),
        Just(RunResult::Invalid),
    ]
}

/// Builds `["1.0.0", "2.0.0", ..., "{n}.0.0"]`.
pub fn numbered_versions(n: usize) -> Vec<Version> {
    (1..=n).map(|i| Version::new(format!("{i}.0.0"))).collect()
}
