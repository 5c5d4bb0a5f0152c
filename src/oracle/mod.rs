//! The single-candidate test oracle.
//!
//! The driver never launches anything itself. It asks an [`Oracle`] to run
//! the snippet against one candidate and classify the outcome. Anything that
//! can answer that question (a process launcher, a mock in tests, a remote
//! runner) implements this trait.
//!
//! The trait-based design enables:
//! - Mock oracles for testing
//! - The command-line [`CommandOracle`] for unattended runs

use std::future::Future;

use crate::types::{RunResult, Version};

pub mod command;

pub use command::{ChildOutput, CommandOracle, CommandOracleError};

/// Runs a snippet against one candidate and classifies the result.
///
/// An `Err` means the oracle itself broke (it could not even attempt a run).
/// The driver treats that the same as `Ok(RunResult::Invalid)`.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct Threshold {
///     first_bad: usize,
/// }
///
/// impl Oracle for Threshold {
///     type Error = std::convert::Infallible;
///
///     async fn run_version(&self, version: &Version) -> Result<RunResult, Self::Error> {
///         let major: usize = version.as_str().split('.').next().unwrap().parse().unwrap();
///         Ok(if major < self.first_bad { RunResult::Success } else { RunResult::Failure })
///     }
/// }
/// ```
pub trait Oracle {
    /// The error type returned by this oracle.
    type Error;

    /// Runs the snippet against `version`.
    fn run_version(
        &self,
        version: &Version,
    ) -> impl Future<Output = Result<RunResult, Self::Error>> + Send;
}

impl<O: Oracle + Sync> Oracle for &O {
    type Error = O::Error;

    fn run_version(
        &self,
        version: &Version,
    ) -> impl Future<Output = Result<RunResult, Self::Error>> + Send {
        (**self).run_version(version)
    }
}
