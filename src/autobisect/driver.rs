//! The autobisect control loop.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::report::{BisectReport, InvalidReason};
use crate::bisect::{BisectStep, Bisector};
use crate::config::BisectConfig;
use crate::narration::{OutputSink, format};
use crate::oracle::Oracle;
use crate::types::{BoundaryPair, RunResult, Version};

/// Marks an autobisect as running for as long as it is alive.
///
/// Only one guard can hold a flag at a time. The flag is cleared on drop, so
/// every exit path (return, panic, or the session future being dropped)
/// clears it.
#[derive(Debug)]
pub struct RunningGuard {
    flag: Arc<AtomicBool>,
}

impl RunningGuard {
    /// Claims `flag`, or returns `None` if another session already holds it.
    pub fn try_acquire(flag: Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunningGuard { flag })
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Results observed during one session.
#[derive(Debug, Default)]
struct SessionMemo {
    results: HashMap<Version, RunResult>,
    tested: Vec<(Version, RunResult)>,
}

impl SessionMemo {
    fn get(&self, version: &Version) -> Option<RunResult> {
        self.results.get(version).copied()
    }

    fn record(&mut self, version: &Version, result: RunResult) {
        self.results.insert(version.clone(), result);
        self.tested.push((version.clone(), result));
    }
}

/// Drives a bisection to completion without a human in the loop.
///
/// # Type Parameters
///
/// * `O` - The oracle that runs one candidate
/// * `S` - Where narration lines go
///
/// # Example
///
/// ```ignore
/// let autobisect = Autobisect::new(oracle, TracingSink);
/// let report = autobisect.run(&versions).await;
/// if let Some(pair) = report.boundary {
///     println!("regressed between {} and {}", pair.good, pair.bad);
/// }
/// ```
pub struct Autobisect<O, S> {
    oracle: O,
    sink: S,
    config: BisectConfig,
    cancel: CancellationToken,
    running: Arc<AtomicBool>,
}

impl<O, S> Autobisect<O, S>
where
    O: Oracle,
    O::Error: fmt::Display,
    S: OutputSink,
{
    /// Creates a driver with default configuration and a fresh cancellation token.
    pub fn new(oracle: O, sink: S) -> Self {
        Autobisect {
            oracle,
            sink,
            config: BisectConfig::default(),
            cancel: CancellationToken::new(),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_config(mut self, config: BisectConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses `cancel` to stop the session between oracle runs.
    ///
    /// Share the same token with the oracle to also abort the run in flight.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns true while `run` is in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// A handle to the running flag that outlives borrows of the driver.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Requests cancellation. The session ends before its next oracle run.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Bisects `versions` (oldest first) and classifies the outcome.
    ///
    /// Never fails: every terminal state, including a broken oracle, is a
    /// `BisectReport`. A call made while another session is in progress on
    /// this driver returns `AlreadyRunning` without touching the oracle.
    #[instrument(skip(self, versions), fields(candidates = versions.len()))]
    pub async fn run(&self, versions: &[Version]) -> BisectReport {
        let Some(_running) = RunningGuard::try_acquire(Arc::clone(&self.running)) else {
            warn!("Autobisect already running; rejecting second session");
            self.sink.push_output(&format::already_running());
            return BisectReport::invalid(InvalidReason::AlreadyRunning, Vec::new());
        };

        if versions.len() < 2 {
            self.sink
                .push_output(&format::insufficient_range(versions.len()));
            return BisectReport::invalid(
                InvalidReason::InsufficientRange {
                    len: versions.len(),
                },
                Vec::new(),
            );
        }

        let mut memo = SessionMemo::default();
        let outcome = self.bisect(versions, &mut memo).await;

        match outcome {
            Ok(pair) => {
                info!(good = %pair.good, bad = %pair.bad, runs = memo.tested.len(), "Autobisect complete");
                for line in format::complete(&pair, &self.config.compare_url) {
                    self.sink.push_output(&line);
                }
                BisectReport::success(pair, memo.tested)
            }
            Err(reason) => {
                info!(%reason, runs = memo.tested.len(), "Autobisect ended without a result");
                BisectReport::invalid(reason, memo.tested)
            }
        }
    }

    async fn bisect(
        &self,
        versions: &[Version],
        memo: &mut SessionMemo,
    ) -> Result<BoundaryPair, InvalidReason> {
        let mut bisector = Bisector::new(versions.to_vec());
        let mut target = bisector.current_version().clone();

        let pair = loop {
            let result = self.test(&target, memo).await?;
            match bisector.continue_with(result.is_success()) {
                BisectStep::Continue(next) => target = next,
                BisectStep::Done(pair) => break pair,
            }
        };

        debug!(good = %pair.good, bad = %pair.bad, "Checking boundaries");
        let good = self.test(&pair.good, memo).await?;
        let bad = self.test(&pair.bad, memo).await?;

        if good == bad {
            self.sink.push_output(&format::ambiguous(&pair, good));
            return Err(InvalidReason::Ambiguous {
                good: pair.good,
                bad: pair.bad,
                result: good,
            });
        }

        Ok(pair)
    }

    /// Returns the result for `version`, running the oracle at most once per session.
    ///
    /// `Invalid` and cancellation come back as the reason the session ends.
    async fn test(
        &self,
        version: &Version,
        memo: &mut SessionMemo,
    ) -> Result<RunResult, InvalidReason> {
        let result = match memo.get(version) {
            Some(result) => {
                debug!(%version, %result, "Reusing earlier result");
                result
            }
            None => {
                if self.cancel.is_cancelled() {
                    self.sink.push_output(&format::cancelled());
                    return Err(InvalidReason::Cancelled);
                }

                self.sink.push_output(&format::setting_version(version));
                self.sink.push_output(&format::starting_test());
                let result = match self.oracle.run_version(version).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(%version, error = %e, "Oracle failed; treating as invalid");
                        RunResult::Invalid
                    }
                };
                memo.record(version, result);
                self.sink
                    .push_output(&format::finished_test(version, result));

                if self.cancel.is_cancelled() {
                    self.sink.push_output(&format::cancelled());
                    return Err(InvalidReason::Cancelled);
                }
                result
            }
        };

        if result.is_invalid() {
            self.sink.push_output(&format::indeterminate(version));
            return Err(InvalidReason::Indeterminate {
                version: version.clone(),
            });
        }
        Ok(result)
    }
}
