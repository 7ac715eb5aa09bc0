use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to start \"{command}\"")]
    Spawn {
        command: String,
        #[source]
        source:  io::Error,
    },
    #[error("\"{command}\" failed: {status}")]
    Status { command: String, status: ExitStatus },
    #[error("failed to write {}", .path.display())]
    Write {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read config file {}", .path.display())]
    ReadConfig {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {}", .path.display())]
    Config {
        path:   PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
