//! Command-line front end for fiddle-bisect.
//!
//! # Usage
//!
//! ```bash
//! # Run a test script against each candidate until the regression is found
//! fiddle-bisect auto --versions 1.0.0,2.0.0,3.0.0,4.0.0 -- ./check.sh {version}
//!
//! # Restrict to a sub-range of a newest-first list and emit JSON
//! fiddle-bisect auto --versions 4.0.0,3.0.0,2.0.0,1.0.0 --newest-first \
//!   --good 1.0.0 --bad 3.0.0 --json -- ./check.sh
//!
//! # Mark each pivot yourself
//! fiddle-bisect manual --versions 1.0.0,2.0.0,3.0.0,4.0.0
//! ```

use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fiddle_bisect::autobisect::Autobisect;
use fiddle_bisect::config::BisectConfig;
use fiddle_bisect::narration::{OutputSink, TracingSink};
use fiddle_bisect::oracle::{ChildOutput, CommandOracle};
use fiddle_bisect::range::{ListOrder, select_range};
use fiddle_bisect::session::{BisectSession, SessionStep, Verdict};
use fiddle_bisect::types::Version;

/// Find the version that introduced a regression
#[derive(Parser, Debug)]
#[command(name = "fiddle-bisect")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run a command against each candidate and bisect unattended
    Auto {
        #[command(flatten)]
        range: RangeArgs,

        /// Per-candidate timeout in seconds (0 disables; overrides FIDDLE_BISECT_TIMEOUT_SECS)
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the final report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Program and arguments to run; `{version}` is replaced with the candidate
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Bisect by answering good/bad for each candidate
    Manual {
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// Known versions (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    versions: Vec<String>,

    /// The versions list is newest first
    #[arg(long)]
    newest_first: bool,

    /// Known good version (defaults to the oldest)
    #[arg(long)]
    good: Option<String>,

    /// Known bad version (defaults to the newest)
    #[arg(long)]
    bad: Option<String>,

    /// Base URL for the compare link (overrides FIDDLE_BISECT_COMPARE_URL)
    #[arg(long)]
    compare_url: Option<String>,
}

impl RangeArgs {
    /// The candidates to bisect, oldest first.
    fn candidates(&self) -> anyhow::Result<Vec<Version>> {
        let order = if self.newest_first {
            ListOrder::NewestFirst
        } else {
            ListOrder::OldestFirst
        };
        let known: Vec<Version> = self
            .versions
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(Version::from)
            .collect();

        let (oldest, newest) = match order {
            ListOrder::OldestFirst => (known.first(), known.last()),
            ListOrder::NewestFirst => (known.last(), known.first()),
        };
        let good = self.good.clone().map(Version::from).or_else(|| oldest.cloned());
        let bad = self.bad.clone().map(Version::from).or_else(|| newest.cloned());

        let (Some(good), Some(bad)) = (good, bad) else {
            anyhow::bail!("no versions given");
        };
        Ok(select_range(&known, &good, &bad, order)?)
    }

    fn config(&self) -> anyhow::Result<BisectConfig> {
        let mut config = BisectConfig::try_from_env()?;
        if let Some(url) = &self.compare_url {
            config = config.with_compare_url(url.clone());
        }
        Ok(config)
    }
}

/// Prints narration to stdout.
struct StdoutSink;

impl OutputSink for StdoutSink {
    fn push_output(&self, line: &str) {
        println!("{}", line);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fiddle_bisect=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Mode::Auto {
            range,
            timeout,
            json,
            command,
        } => run_auto(range, timeout, json, command).await,
        Mode::Manual { range } => run_manual(range).await,
    }
}

async fn run_auto(
    range: RangeArgs,
    timeout: Option<u64>,
    json: bool,
    command: Vec<String>,
) -> anyhow::Result<ExitCode> {
    let versions = range.candidates()?;
    let mut config = range.config()?;
    if let Some(secs) = timeout {
        config = config.with_timeout_secs(secs);
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted; cancelling bisect");
                cancel.cancel();
            }
        });
    }

    let mut command = command.into_iter();
    let program = command.next().context("no command given")?;
    // With --json, stdout carries only the report.
    let child_output = if json {
        ChildOutput::Stderr
    } else {
        ChildOutput::Inherit
    };
    let oracle = CommandOracle::from_config(program, command, &config)
        .with_stdout(child_output)
        .with_cancellation(cancel.clone());

    let report = if json {
        Autobisect::new(oracle, TracingSink)
            .with_config(config)
            .with_cancellation(cancel)
            .run(&versions)
            .await
    } else {
        Autobisect::new(oracle, StdoutSink)
            .with_config(config)
            .with_cancellation(cancel)
            .run(&versions)
            .await
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(reason) = &report.reason {
        println!("Autobisect {}: {}", report.result, reason);
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_manual(range: RangeArgs) -> anyhow::Result<ExitCode> {
    let versions = range.candidates()?;
    let config = range.config()?;
    let mut session = BisectSession::start(versions, StdoutSink, &config)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("Is {} good or bad? [good/bad/cancel]", session.current());
        let Some(input) = lines.next_line().await? else {
            session.cancel();
            return Ok(ExitCode::FAILURE);
        };
        if input.trim().eq_ignore_ascii_case("cancel") {
            session.cancel();
            return Ok(ExitCode::FAILURE);
        }

        let verdict = match input.parse::<Verdict>() {
            Ok(verdict) => verdict,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if let SessionStep::Complete(_) = session.mark(verdict)? {
            return Ok(ExitCode::SUCCESS);
        }
    }
}
