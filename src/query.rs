use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};

/// Characters stripped from both ends of a query's output. Inner content,
/// tabs included, is kept as is.
const TRIM_CHARS: &[char] = &['\n', '\r', ' '];

/// Runs an external command and hands back its raw standard output.
pub trait QueryRunner {
    /// # Errors
    ///
    /// Fails when the command cannot be started or exits unsuccessfully.
    fn run(&self, command: &str, args: &[String]) -> Result<String>;
}

/// Spawns the command as a child process. Stdout is captured, stderr goes
/// straight to our own stderr so the operator sees git's complaints.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl QueryRunner for SystemRunner {
    fn run(&self, command: &str, args: &[String]) -> Result<String> {
        let output = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| Error::Spawn {
                command: command_line(command, args),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Status {
                command: command_line(command, args),
                status:  output.status,
            });
        }

        // Invalid UTF-8 is replaced with U+FFFD.
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A named query against the source-control metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub name:    String,
    pub command: String,
    pub args:    Vec<String>,
}

impl Query {
    pub fn new(name: impl Into<String>, command: impl Into<String>, args: &[&str]) -> Self {
        Self {
            name:    name.into(),
            command: command.into(),
            args:    args.iter().map(ToString::to_string).collect(),
        }
    }

    /// Nearest tag, with a `-dirty` suffix for local changes. Falls back to
    /// the abbreviated hash when no tag is reachable.
    pub fn summary(git: &str) -> Self {
        Self::new("GitSummary", git, &["describe", "--tags", "--dirty", "--always"])
    }

    /// Short name of the checked out branch. Git exits non-zero on a
    /// detached HEAD.
    pub fn branch(git: &str) -> Self {
        Self::new("GitBranch", git, &["symbolic-ref", "-q", "--short", "HEAD"])
    }

    pub fn command_line(&self) -> String {
        command_line(&self.command, &self.args)
    }

    /// # Errors
    ///
    /// Propagates the runner's failure unchanged.
    pub fn execute(&self, runner: &impl QueryRunner) -> Result<QueryResult> {
        let raw = runner.run(&self.command, &self.args)?;
        let output = trim_output(&raw).to_owned();
        debug!(name = %self.name, command = %self.command_line(), %output, "query finished");
        Ok(QueryResult {
            query: self.clone(),
            output,
        })
    }
}

/// A query together with its trimmed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub query:  Query,
    pub output: String,
}

pub fn trim_output(raw: &str) -> &str {
    raw.trim_matches(TRIM_CHARS)
}

fn command_line(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        command.to_owned()
    } else {
        format!("{command} {}", args.join(" "))
    }
}
