//! The classification an autobisect session ends with.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{BoundaryPair, RunResult, Version};

/// Why a session ended with `Invalid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvalidReason {
    /// Fewer than two candidates; nothing was run.
    InsufficientRange { len: usize },

    /// The oracle could not classify this candidate.
    Indeterminate { version: Version },

    /// Both boundaries produced the same result, so the regression cannot be
    /// localized within the range.
    Ambiguous {
        good: Version,
        bad: Version,
        result: RunResult,
    },

    /// The session was cancelled before it finished.
    Cancelled,

    /// Another session was already running on the same driver.
    AlreadyRunning,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::InsufficientRange { len } => {
                write!(f, "need at least two versions to bisect, got {}", len)
            }
            InvalidReason::Indeterminate { version } => {
                write!(f, "could not determine a result for {}", version)
            }
            InvalidReason::Ambiguous { good, bad, result } => write!(
                f,
                "'good' {} and 'bad' {} both returned {}",
                good, bad, result
            ),
            InvalidReason::Cancelled => write!(f, "bisect cancelled"),
            InvalidReason::AlreadyRunning => write!(f, "another bisect is already running"),
        }
    }
}

/// The outcome of one autobisect session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BisectReport {
    /// `Success` when the regression was localized, `Invalid` otherwise.
    pub result: RunResult,

    /// The localized boundary. Present only on `Success`.
    pub boundary: Option<BoundaryPair>,

    /// Present only on `Invalid`.
    pub reason: Option<InvalidReason>,

    /// Every real oracle invocation, in order. Memo hits are not repeated.
    pub tested: Vec<(Version, RunResult)>,
}

impl BisectReport {
    pub fn success(boundary: BoundaryPair, tested: Vec<(Version, RunResult)>) -> Self {
        BisectReport {
            result: RunResult::Success,
            boundary: Some(boundary),
            reason: None,
            tested,
        }
    }

    pub fn invalid(reason: InvalidReason, tested: Vec<(Version, RunResult)>) -> Self {
        BisectReport {
            result: RunResult::Invalid,
            boundary: None,
            reason: Some(reason),
            tested,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}
