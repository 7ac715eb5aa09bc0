use std::env;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use tempfile::Builder;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::query::{Query, QueryResult, QueryRunner};
use crate::render::{format_timestamp, format_timestamp_numeric, render_file};

/// Mode for a newly created destination, before the umask.
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Parses an IANA zone name as found in `TZ`, leading `:` allowed.
pub fn parse_zone(name: &str) -> Option<Tz> {
    name.trim_start_matches(':').parse().ok()
}

/// Local zone from `TZ`, or from the system setting when `TZ` is unset.
fn local_zone() -> Option<Tz> {
    match env::var("TZ") {
        Ok(name) if !name.is_empty() => parse_zone(&name),
        _ => iana_time_zone::get_timezone()
            .ok()
            .and_then(|name| parse_zone(&name)),
    }
}

/// Local time with the zone abbreviation (`EDT`, `UTC`), or a numeric
/// offset when the local zone has no IANA name.
pub fn local_timestamp(now: &DateTime<Utc>) -> String {
    match local_zone() {
        Some(zone) => format_timestamp(&now.with_timezone(&zone)),
        None => {
            debug!("local time zone has no name, using numeric offset");
            format_timestamp_numeric(&now.with_timezone(&Local))
        }
    }
}

/// Full text of the generated file and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path:    PathBuf,
    pub content: String,
}

impl GeneratedFile {
    /// Replaces the destination atomically. The content goes to a temporary
    /// file next to it first, so a failed run leaves any previous file
    /// intact and never a fragment.
    ///
    /// A new file gets mode 0644 minus the umask, an existing one keeps its
    /// mode. A symlinked destination is written through, the link stays.
    ///
    /// # Errors
    ///
    /// Fails if the parent directory is missing or not writable.
    pub fn write(&self) -> Result<()> {
        let write_error = |source| Error::Write {
            path: self.path.clone(),
            source,
        };

        let target = match fs::symlink_metadata(&self.path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                fs::canonicalize(&self.path).map_err(write_error)?
            }
            _ => self.path.clone(),
        };
        let existing = fs::metadata(&target).ok().map(|meta| meta.permissions());

        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;

            builder.permissions(fs::Permissions::from_mode(FILE_MODE));
        }

        let mut file = builder.tempfile_in(parent).map_err(write_error)?;
        file.write_all(self.content.as_bytes())
            .map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;

        if let Some(permissions) = existing {
            file.as_file()
                .set_permissions(permissions)
                .map_err(write_error)?;
        }

        file.persist(&target)
            .map_err(|err| write_error(err.error))?;
        Ok(())
    }
}

pub struct Generator<R> {
    config: GeneratorConfig,
    runner: R,
}

impl<R: QueryRunner> Generator<R> {
    pub const fn new(config: GeneratorConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Summary first, then branch. The rendered file keeps this order.
    pub fn queries(&self) -> [Query; 2] {
        [
            Query::summary(&self.config.git),
            Query::branch(&self.config.git),
        ]
    }

    /// Runs every query in sequence and stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the failing query's error.
    pub fn collect(&self) -> Result<Vec<QueryResult>> {
        self.queries()
            .iter()
            .map(|query| query.execute(&self.runner))
            .collect()
    }

    pub fn render(&self, results: &[QueryResult], timestamp: &str) -> GeneratedFile {
        GeneratedFile {
            path:    self.config.destination.clone(),
            content: render_file(
                &self.config.package,
                &self.config.source,
                timestamp,
                results,
            ),
        }
    }

    /// Queries, stamps with the local time, and writes the destination.
    /// Nothing is written unless every query succeeded.
    ///
    /// # Errors
    ///
    /// Returns the first query or write failure.
    pub fn run(&self) -> Result<GeneratedFile> {
        let results = self.collect()?;
        let timestamp = local_timestamp(&Utc::now());
        let file = self.render(&results, &timestamp);

        info!("Writing {}...", file.path.display());
        file.write()?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::TimeZone as _;
    use tracing_test::traced_test;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl QueryRunner for Recorder {
        fn run(&self, command: &str, args: &[String]) -> Result<String> {
            self.calls
                .borrow_mut()
                .push(format!("{command} {}", args.join(" ")));
            Ok("x\n".to_owned())
        }
    }

    #[test]
    fn queries_run_in_order_with_configured_git() {
        let config = GeneratorConfig {
            git: "/opt/git".to_owned(),
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(config, Recorder::default());

        let results = generator.collect().unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(*generator.runner.calls.borrow(), vec![
            "/opt/git describe --tags --dirty --always".to_owned(),
            "/opt/git symbolic-ref -q --short HEAD".to_owned(),
        ]);
    }

    #[test]
    fn render_targets_destination() {
        let generator = Generator::new(GeneratorConfig::default(), Recorder::default());
        let results = generator.collect().unwrap();

        let file = generator.render(&results, "now");

        assert_eq!(file.path, PathBuf::from("version/version.go"));
        assert!(file.content.starts_with(
            "// Package version is auto-generated using version/cmd/generate.go on non-release \
             builds.\npackage version\n"
        ));
    }

    #[test]
    #[traced_test]
    fn run_announces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            destination: dir.path().join("version.go"),
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(config, Recorder::default());

        let file = generator.run().unwrap();

        assert!(logs_contain("Writing"));
        assert!(logs_contain("version.go..."));
        assert_eq!(std::fs::read_to_string(&file.path).unwrap(), file.content);
    }

    #[test]
    fn zone_names() {
        assert_eq!(parse_zone("America/New_York"), Some(chrono_tz::America::New_York));
        assert_eq!(parse_zone(":Europe/Berlin"), Some(chrono_tz::Europe::Berlin));
        assert_eq!(parse_zone("UTC"), Some(Tz::UTC));
        assert_eq!(parse_zone("not/a-zone"), None);
    }

    #[test]
    fn local_timestamp_keeps_layout() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 17, 38, 12).unwrap();
        let stamp = local_timestamp(&now);
        let fields: Vec<&str> = stamp.split_whitespace().collect();

        assert_eq!(fields.len(), 6);
        assert!(fields[3].contains(':'));
        assert_eq!(fields[5], "2026");
        assert!(!fields[4].contains(':'), "zone rendered as {:?}", fields[4]);
    }

    #[test]
    fn write_creates_destination() {
        let dir = tempfile::tempdir().unwrap();
        let file = GeneratedFile {
            path:    dir.path().join("version.go"),
            content: "package version\n".to_owned(),
        };

        file.write().unwrap();

        assert_eq!(
            std::fs::read_to_string(&file.path).unwrap(),
            "package version\n"
        );
    }
}
