//! Selecting the candidate range for a bisection.
//!
//! Users pick a known-good and a known-bad version from the full version
//! list. Version lists are commonly shown newest first, while a bisector
//! wants oldest first, so the slice is reversed when needed.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::Version;

/// The order of a known-versions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Index 0 is the oldest release.
    #[default]
    OldestFirst,

    /// Index 0 is the newest release.
    NewestFirst,
}

/// Errors from range selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    /// No known versions to choose from.
    #[error("no versions available")]
    Empty,

    /// A requested endpoint is not in the known list.
    #[error("unknown version: {0}")]
    UnknownVersion(Version),

    /// The known list names the same version twice.
    #[error("duplicate version: {0}")]
    Duplicate(Version),

    /// The good endpoint is newer than the bad endpoint.
    #[error("good version {good} is newer than bad version {bad}")]
    Inverted { good: Version, bad: Version },
}

/// Returns the inclusive range from `good` to `bad`, oldest first.
///
/// A single-version range (`good == bad`) is allowed; the driver rejects it.
/// A list with a repeated version is rejected, since the bisector would test
/// the repeat as if it were a separate release.
pub fn select_range(
    known: &[Version],
    good: &Version,
    bad: &Version,
    order: ListOrder,
) -> Result<Vec<Version>, RangeError> {
    if known.is_empty() {
        return Err(RangeError::Empty);
    }

    let mut seen = HashSet::with_capacity(known.len());
    if let Some(dup) = known.iter().find(|v| !seen.insert(*v)) {
        return Err(RangeError::Duplicate(dup.clone()));
    }

    let oldest_first: Vec<&Version> = match order {
        ListOrder::OldestFirst => known.iter().collect(),
        ListOrder::NewestFirst => known.iter().rev().collect(),
    };

    let position = |target: &Version| {
        oldest_first
            .iter()
            .position(|v| *v == target)
            .ok_or_else(|| RangeError::UnknownVersion(target.clone()))
    };
    let start = position(good)?;
    let end = position(bad)?;

    if start > end {
        return Err(RangeError::Inverted {
            good: good.clone(),
            bad: bad.clone(),
        });
    }

    Ok(oldest_first[start..=end]
        .iter()
        .map(|v| (*v).clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::numbered_versions;

    #[test]
    fn oldest_first_slice() {
        let known = numbered_versions(9);
        let range = select_range(
            &known,
            &"3.0.0".into(),
            &"6.0.0".into(),
            ListOrder::OldestFirst,
        )
        .unwrap();
        assert_eq!(range, known[2..=5].to_vec());
    }

    #[test]
    fn newest_first_is_reversed() {
        let mut known = numbered_versions(5);
        known.reverse();
        let range = select_range(
            &known,
            &"2.0.0".into(),
            &"4.0.0".into(),
            ListOrder::NewestFirst,
        )
        .unwrap();
        let names: Vec<&str> = range.iter().map(Version::as_str).collect();
        assert_eq!(names, vec!["2.0.0", "3.0.0", "4.0.0"]);
    }

    #[test]
    fn same_endpoint_gives_one_version() {
        let known = numbered_versions(3);
        let range = select_range(
            &known,
            &"2.0.0".into(),
            &"2.0.0".into(),
            ListOrder::OldestFirst,
        )
        .unwrap();
        assert_eq!(range, vec![Version::from("2.0.0")]);
    }

    #[test]
    fn unknown_endpoint() {
        let err = select_range(
            &numbered_versions(3),
            &"1.0.0".into(),
            &"7.0.0".into(),
            ListOrder::OldestFirst,
        )
        .unwrap_err();
        assert_eq!(err, RangeError::UnknownVersion("7.0.0".into()));
    }

    #[test]
    fn inverted_endpoints() {
        let err = select_range(
            &numbered_versions(3),
            &"3.0.0".into(),
            &"1.0.0".into(),
            ListOrder::OldestFirst,
        )
        .unwrap_err();
        assert!(matches!(err, RangeError::Inverted { .. }));
    }

    #[test]
    fn repeated_version_is_rejected() {
        let known: Vec<Version> = ["1.0.0", "2.0.0", "2.0.0", "3.0.0"]
            .into_iter()
            .map(Version::from)
            .collect();
        let err = select_range(
            &known,
            &"1.0.0".into(),
            &"3.0.0".into(),
            ListOrder::OldestFirst,
        )
        .unwrap_err();
        assert_eq!(err, RangeError::Duplicate("2.0.0".into()));
    }

    #[test]
    fn repeat_outside_the_selected_range_is_still_rejected() {
        let mut known = numbered_versions(4);
        known.push("1.0.0".into());
        let err = select_range(
            &known,
            &"2.0.0".into(),
            &"3.0.0".into(),
            ListOrder::OldestFirst,
        )
        .unwrap_err();
        assert_eq!(err, RangeError::Duplicate("1.0.0".into()));
    }

    #[test]
    fn empty_list() {
        let err = select_range(&[], &"1".into(), &"2".into(), ListOrder::OldestFirst).unwrap_err();
        assert_eq!(err, RangeError::Empty);
    }
}
