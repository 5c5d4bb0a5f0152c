//! Interactive bisection.
//!
//! A human runs each pivot themselves and reports good or bad. The session
//! owns the bisector, keeps the verdict history, and narrates progress the
//! same way the unattended driver does.

use std::str::FromStr;

use thiserror::Error;

use crate::bisect::{BisectStep, Bisector};
use crate::config::BisectConfig;
use crate::narration::{OutputSink, format};
use crate::types::{BoundaryPair, Version};

/// A human's verdict on the current pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The regression is not present.
    Good,

    /// The regression is present.
    Bad,
}

impl Verdict {
    pub fn is_good(&self) -> bool {
        matches!(self, Verdict::Good)
    }
}

impl FromStr for Verdict {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" | "g" => Ok(Verdict::Good),
            "bad" | "b" => Ok(Verdict::Bad),
            other => Err(SessionError::UnknownVerdict(other.to_string())),
        }
    }
}

/// What to do after a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep {
    /// Test this version next.
    Next(Version),

    /// The regression lies between these versions.
    Complete(BoundaryPair),
}

/// Errors from driving an interactive session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Fewer than two versions were supplied.
    #[error("need at least two versions to bisect, got {len}")]
    InsufficientRange { len: usize },

    /// The session already completed or was cancelled.
    #[error("bisect session is already finished")]
    Finished,

    /// Input that is neither "good" nor "bad".
    #[error("unknown verdict {0:?}; expected \"good\" or \"bad\"")]
    UnknownVerdict(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Active,
    Complete(BoundaryPair),
    Cancelled,
}

/// A human-driven bisection.
pub struct BisectSession<S> {
    bisector: Bisector,
    sink: S,
    compare_url: String,
    history: Vec<(Version, Verdict)>,
    state: SessionState,
}

impl<S: OutputSink> BisectSession<S> {
    /// Starts a session over `versions`, oldest first.
    pub fn start(
        versions: Vec<Version>,
        sink: S,
        config: &BisectConfig,
    ) -> Result<Self, SessionError> {
        if versions.len() < 2 {
            return Err(SessionError::InsufficientRange {
                len: versions.len(),
            });
        }

        let bisector = Bisector::new(versions);
        sink.push_output(&format::manual_next(bisector.current_version()));
        Ok(BisectSession {
            bisector,
            sink,
            compare_url: config.compare_url.clone(),
            history: Vec::new(),
            state: SessionState::Active,
        })
    }

    /// The version the human should test now.
    pub fn current(&self) -> &Version {
        self.bisector.current_version()
    }

    /// Records a verdict on the current version.
    pub fn mark(&mut self, verdict: Verdict) -> Result<SessionStep, SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::Finished);
        }

        let version = self.bisector.current_version().clone();
        self.sink
            .push_output(&format::manual_mark(&version, verdict.is_good()));
        self.history.push((version, verdict));

        match self.bisector.continue_with(verdict.is_good()) {
            BisectStep::Continue(next) => {
                self.sink.push_output(&format::manual_next(&next));
                Ok(SessionStep::Next(next))
            }
            BisectStep::Done(pair) => {
                self.sink.push_output(&format::manual_complete(&pair));
                self.sink
                    .push_output(&format::compare_link(&self.compare_url, &pair));
                self.state = SessionState::Complete(pair.clone());
                Ok(SessionStep::Complete(pair))
            }
        }
    }

    /// Abandons the session. Later marks return `Finished`.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Active {
            self.sink.push_output(&format::manual_cancelled());
            self.state = SessionState::Cancelled;
        }
    }

    /// Every verdict so far, in order.
    pub fn history(&self) -> &[(Version, Verdict)] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.state != SessionState::Active
    }

    /// The final boundary, if the session completed.
    pub fn boundary(&self) -> Option<&BoundaryPair> {
        match &self.state {
            SessionState::Complete(pair) => Some(pair),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::RecordingSink;
    use crate::test_utils::numbered_versions;

    #[test]
    fn walks_nine_versions() {
        let sink = RecordingSink::new();
        let mut session =
            BisectSession::start(numbered_versions(9), &sink, &BisectConfig::new()).unwrap();

        assert_eq!(session.current().as_str(), "5.0.0");
        assert_eq!(
            session.mark(Verdict::Bad).unwrap(),
            SessionStep::Next("3.0.0".into())
        );
        assert_eq!(
            session.mark(Verdict::Bad).unwrap(),
            SessionStep::Next("2.0.0".into())
        );
        assert_eq!(
            session.mark(Verdict::Good).unwrap(),
            SessionStep::Complete(BoundaryPair::new("2.0.0", "3.0.0"))
        );

        assert!(session.is_finished());
        assert_eq!(
            session.boundary(),
            Some(&BoundaryPair::new("2.0.0", "3.0.0"))
        );
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.mark(Verdict::Good), Err(SessionError::Finished));

        let lines = sink.lines();
        assert!(lines.contains(&"Bisect complete. Check the range 2.0.0...3.0.0.".to_string()));
        assert_eq!(
            lines.last().map(String::as_str),
            Some("https://github.com/electron/electron/compare/v2.0.0...v3.0.0")
        );
    }

    #[test]
    fn rejects_short_ranges() {
        let err = BisectSession::start(
            numbered_versions(1),
            RecordingSink::new(),
            &BisectConfig::new(),
        )
        .err();
        assert_eq!(err, Some(SessionError::InsufficientRange { len: 1 }));
    }

    #[test]
    fn cancel_ends_session() {
        let sink = RecordingSink::new();
        let mut session =
            BisectSession::start(numbered_versions(4), &sink, &BisectConfig::new()).unwrap();
        session.cancel();
        session.cancel();

        assert!(session.is_finished());
        assert_eq!(session.boundary(), None);
        assert_eq!(session.mark(Verdict::Bad), Err(SessionError::Finished));
        let cancelled = sink
            .lines()
            .iter()
            .filter(|l| *l == "Bisect cancelled")
            .count();
        assert_eq!(cancelled, 1);
    }

    #[test]
    fn parses_verdicts() {
        assert_eq!("good".parse::<Verdict>(), Ok(Verdict::Good));
        assert_eq!(" B ".parse::<Verdict>(), Ok(Verdict::Bad));
        assert_eq!(
            "maybe".parse::<Verdict>(),
            Err(SessionError::UnknownVerdict("maybe".to_string()))
        );
    }
}
