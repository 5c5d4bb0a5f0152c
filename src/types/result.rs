//! Test outcomes and the boundary a finished bisection reports.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::Version;

/// The outcome of running a snippet against one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunResult {
    /// The snippet ran and did not exhibit the regression.
    Success,

    /// The snippet ran and exhibited the regression.
    Failure,

    /// The run could not be classified (missing build, launch failure,
    /// aborted run). Poisons any bisection it appears in.
    Invalid,
}

impl RunResult {
    /// Returns true for `Success`, the "good" verdict fed to a bisector.
    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Success)
    }

    /// Returns true for `Invalid`.
    pub fn is_invalid(&self) -> bool {
        matches!(self, RunResult::Invalid)
    }

    /// Returns the serialized name of this result.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunResult::Success => "success",
            RunResult::Failure => "failure",
            RunResult::Invalid => "invalid",
        }
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable label for a result, used in narration.
pub fn result_string(result: RunResult) -> &'static str {
    match result {
        RunResult::Success => "passed",
        RunResult::Failure => "failed",
        RunResult::Invalid => "invalid",
    }
}

/// The two candidates bracketing a regression once bisection terminates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryPair {
    /// Last known good candidate (lower index).
    pub good: Version,

    /// First known bad candidate (higher index).
    pub bad: Version,
}

impl BoundaryPair {
    pub fn new(good: impl Into<Version>, bad: impl Into<Version>) -> Self {
        BoundaryPair {
            good: good.into(),
            bad: bad.into(),
        }
    }
}

impl fmt::Display for BoundaryPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...{}", self.good, self.bad)
    }
}
