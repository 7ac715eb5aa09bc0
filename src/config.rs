use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// File the constants are written to, relative to the working directory
    #[serde(default = "default::destination")]
    pub destination: PathBuf,

    /// Source-control executable, looked up on `PATH` unless absolute
    #[serde(default = "default::git")]
    pub git: String,

    /// Go package declared by the generated file
    #[serde(default = "default::package")]
    pub package: String,

    /// Generator path named in the package doc comment
    #[serde(default = "default::source")]
    pub source: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            destination: default::destination(),
            git:         default::git(),
            package:     default::package(),
            source:      default::source(),
        }
    }
}

impl Config {
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::Config {
            path: path.to_owned(),
            source,
        })
    }
}

pub mod default {
    use std::path::PathBuf;

    pub fn destination() -> PathBuf {
        PathBuf::from("version/version.go")
    }

    pub fn git() -> String {
        "git".to_string()
    }

    pub fn package() -> String {
        "version".to_string()
    }

    pub fn source() -> String {
        "version/cmd/generate.go".to_string()
    }
}
