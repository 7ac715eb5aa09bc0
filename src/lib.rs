#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Writes `version/version.go` with the output of `git describe` and
//! `git symbolic-ref`, plus a build timestamp.

pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod query;
pub mod render;

use std::path::PathBuf;

use anyhow::{Context as _, Result as AnyhowResult};
use clap::Parser;

use crate::config::Config;
use crate::generator::Generator;
use crate::query::SystemRunner;

pub use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[group(skip)]
pub struct Options {
    /// TOML file with a `[generator]` section
    #[clap(long, env = "VERSION_GEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides the file to write
    #[clap(long, env = "VERSION_GEN_DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Overrides the git executable
    #[clap(long, env = "VERSION_GEN_GIT")]
    pub git: Option<String>,
}

impl Options {
    /// Defaults, then the config file, then explicit overrides.
    ///
    /// # Errors
    ///
    /// Fails if the config file cannot be loaded.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(destination) = &self.destination {
            config.generator.destination.clone_from(destination);
        }
        if let Some(git) = &self.git {
            config.generator.git.clone_from(git);
        }
        Ok(config)
    }
}

/// # Errors
///
/// Any failure is fatal to the run; nothing is retried.
pub fn main(options: &Options) -> AnyhowResult<()> {
    let config = options.resolve().context("Error loading configuration")?;
    let generator = Generator::new(config.generator, SystemRunner);
    generator
        .run()
        .context("Error generating version file")?;
    Ok(())
}
