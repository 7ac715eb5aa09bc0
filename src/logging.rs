use core::str::FromStr;
use std::io::{self, IsTerminal as _};

use anyhow::{bail, Context as _, Error as AnyhowError, Result as AnyhowResult};
use clap::{ArgAction, Parser};
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, Registry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AnyhowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "compact" => Self::Compact,
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => bail!("Invalid log format: {}", s),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[group(skip)]
pub struct Options {
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Apply an env_filter compatible log filter
    #[clap(long, env = "VERSION_GEN_LOG_FILTER", default_value = "")]
    pub log_filter: String,

    /// Log format, one of 'compact', 'pretty' or 'json'
    #[clap(long, env = "VERSION_GEN_LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,
}

impl Options {
    /// Log filtering is a combination of `--log-filter` and `--verbose`.
    ///
    /// # Errors
    ///
    /// Fails if `--log-filter` does not parse.
    pub fn targets(&self) -> AnyhowResult<Targets> {
        let (all, app) = match self.verbose {
            0 => (Level::INFO, Level::INFO),
            1 => (Level::INFO, Level::DEBUG),
            2 => (Level::INFO, Level::TRACE),
            3 => (Level::DEBUG, Level::TRACE),
            _ => (Level::TRACE, Level::TRACE),
        };
        let verbosity = Targets::new()
            .with_default(all)
            .with_target(env!("CARGO_CRATE_NAME"), app);
        let log_filter = if self.log_filter.is_empty() {
            Targets::new()
        } else {
            self.log_filter
                .parse()
                .context("Error parsing log-filter")?
        };
        Ok(verbosity.with_targets(log_filter))
    }

    /// Installs the global subscriber. Everything goes to stderr.
    ///
    /// # Errors
    ///
    /// Fails on a bad filter or if a subscriber is already installed.
    pub fn init(&self) -> AnyhowResult<()> {
        let targets = self.targets()?;
        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal());
        let layer = match self.log_format {
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Json => layer.json().boxed(),
        };
        tracing::subscriber::set_global_default(
            Registry::default().with(layer.with_filter(targets)),
        )
        .context("setting default log subscriber")
    }
}
