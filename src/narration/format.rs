//! Narration line formatting.
//!
//! Pure functions only; the driver decides when each line is pushed.

use crate::types::{BoundaryPair, RunResult, Version, result_string};

/// Prefix on every unattended-bisect line.
pub const AUTOBISECT_PREFIX: &str = "Autobisect";

pub fn insufficient_range(len: usize) -> String {
    format!("{AUTOBISECT_PREFIX} needs at least two versions to bisect (got {len})")
}

pub fn setting_version(version: &Version) -> String {
    format!("{AUTOBISECT_PREFIX} Setting version to {version}")
}

pub fn starting_test() -> String {
    format!("{AUTOBISECT_PREFIX} Starting test")
}

pub fn finished_test(version: &Version, result: RunResult) -> String {
    format!(
        "{AUTOBISECT_PREFIX} Finished test {version}: {}",
        result_string(result)
    )
}

pub fn indeterminate(version: &Version) -> String {
    format!("{AUTOBISECT_PREFIX} Could not determine a result for {version}; stopping")
}

pub fn already_running() -> String {
    format!("{AUTOBISECT_PREFIX} is already running; wait for it to finish")
}

pub fn cancelled() -> String {
    format!("{AUTOBISECT_PREFIX} Cancelled")
}

pub fn ambiguous(pair: &BoundaryPair, result: RunResult) -> String {
    format!(
        "{AUTOBISECT_PREFIX} 'good' {} and 'bad' {} both {}; the regression is not in this range",
        pair.good,
        pair.bad,
        result_string(result)
    )
}

/// Summary lines for a successful autobisect, in push order.
pub fn complete(pair: &BoundaryPair, compare_url: &str) -> Vec<String> {
    vec![
        format!("{AUTOBISECT_PREFIX} complete"),
        format!(
            "{AUTOBISECT_PREFIX} {} {}",
            result_string(RunResult::Success),
            pair.good
        ),
        format!(
            "{AUTOBISECT_PREFIX} {} {}",
            result_string(RunResult::Failure),
            pair.bad
        ),
        format!("{AUTOBISECT_PREFIX} Commits between versions:"),
        compare_link(compare_url, pair),
    ]
}

/// `{base}/v{good}...v{bad}`.
pub fn compare_link(base: &str, pair: &BoundaryPair) -> String {
    format!(
        "{}/v{}...v{}",
        base.trim_end_matches('/'),
        pair.good.bare(),
        pair.bad.bare()
    )
}

pub fn manual_mark(version: &Version, is_good: bool) -> String {
    let verdict = if is_good { "good" } else { "bad" };
    format!("Bisect: marked {version} as {verdict}")
}

pub fn manual_next(version: &Version) -> String {
    format!("Bisect: next version to test is {version}")
}

pub fn manual_complete(pair: &BoundaryPair) -> String {
    format!("Bisect complete. Check the range {}...{}.", pair.good, pair.bad)
}

pub fn manual_cancelled() -> String {
    "Bisect cancelled".to_string()
}
