#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use version_gen::logging;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " ",
    env!("COMMIT_SHA"),
    " (",
    env!("BUILD_DATE"),
    ")",
);

#[derive(Debug, Parser)]
#[clap(name = "version-gen", version = VERSION, about)]
struct Options {
    #[clap(flatten)]
    log: logging::Options,

    #[clap(flatten)]
    app: version_gen::Options,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Parse CLI and handle help and version (which will stop the application).
    let options = Options::parse();

    if let Err(err) = options.log.init() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    match version_gen::main(&options.app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
