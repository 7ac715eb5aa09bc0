// We include this module in multiple integration
// test crates - so some code may not be used in some cases
#![allow(dead_code)]

pub mod prelude {
    pub use std::fs;
    pub use std::path::{Path, PathBuf};

    pub use indoc::formatdoc;
    pub use tempfile::TempDir;
    pub use version_gen::config::GeneratorConfig;
    pub use version_gen::generator::Generator;
    pub use version_gen::query::QueryRunner;
    pub use version_gen::Error;

    pub use super::{generator_in, Canned, FailingBranch};
}

use std::path::Path;
use std::process::ExitStatus;

use version_gen::config::GeneratorConfig;
use version_gen::generator::Generator;
use version_gen::query::QueryRunner;
use version_gen::{Error, Result};

/// Answers `describe` and `symbolic-ref` with fixed raw output.
pub struct Canned {
    pub summary: &'static str,
    pub branch:  &'static str,
}

impl QueryRunner for Canned {
    fn run(&self, _command: &str, args: &[String]) -> Result<String> {
        match args.first().map(String::as_str) {
            Some("describe") => Ok(self.summary.to_owned()),
            Some("symbolic-ref") => Ok(self.branch.to_owned()),
            other => panic!("unexpected query {other:?}"),
        }
    }
}

/// Behaves like git on a detached HEAD.
pub struct FailingBranch;

impl QueryRunner for FailingBranch {
    fn run(&self, command: &str, args: &[String]) -> Result<String> {
        match args.first().map(String::as_str) {
            Some("describe") => Ok("v1.0.0-2-gabcdef0\n".to_owned()),
            _ => Err(Error::Status {
                command: format!("{command} {}", args.join(" ")),
                status:  failed_status(),
            }),
        }
    }
}

#[cfg(unix)]
fn failed_status() -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(1 << 8)
}

#[cfg(windows)]
fn failed_status() -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(1)
}

/// Generator writing `version.go` inside `dir`.
pub fn generator_in<R: QueryRunner>(dir: &Path, runner: R) -> Generator<R> {
    let config = GeneratorConfig {
        destination: dir.join("version.go"),
        ..GeneratorConfig::default()
    };
    Generator::new(config, runner)
}
