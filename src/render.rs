//! Text of the generated Go file. Everything in here is pure: the same
//! inputs always render to the same bytes.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use indoc::formatdoc;

use crate::query::QueryResult;

/// Unix `date` layout, day of month padded with a space.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Z %Y";
pub const NUMERIC_TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %z %Y";

pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Same layout with a `-0700` style zone, used when the zone has no name.
pub fn format_timestamp_numeric<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format(NUMERIC_TIMESTAMP_FORMAT).to_string()
}

/// Extra comment line for the constants consumers know about.
pub fn advisory_note(name: &str) -> Option<&'static str> {
    match name {
        "GitSummary" => {
            Some("For release builds, manually edit this to reflect the released version tag.")
        }
        "GitBranch" => Some("For release builds this should be left empty."),
        _ => None,
    }
}

/// One constant declaration, preceded by an empty line and its comments.
pub fn constant_block(result: &QueryResult) -> String {
    let name = &result.query.name;
    let mut block = format!(
        "\n// {name} is the output of \"{}\"\n",
        result.query.command_line()
    );
    if let Some(note) = advisory_note(name) {
        block.push_str("// ");
        block.push_str(note);
        block.push('\n');
    }
    block.push_str(&format!("const {name} = \"{}\"\n", result.output));
    block
}

pub fn header(package: &str, source: &str, timestamp: &str) -> String {
    formatdoc! {"
        // Package {package} is auto-generated using {source} on non-release builds.
        package {package}

        // AUTO-GENERATED. DO NOT EDIT
        // {timestamp}
    "}
}

pub fn render_file(package: &str, source: &str, timestamp: &str, results: &[QueryResult]) -> String {
    let mut content = header(package, source, timestamp);
    for result in results {
        content.push_str(&constant_block(result));
    }
    content
}
