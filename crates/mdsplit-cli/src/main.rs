//! mdsplit CLI
//!
//! Splits markdown files into titled entries with merged metadata.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use mdsplit_cli::{Cli, logging, run};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let stdout = std::io::stdout();
    let report = run(&cli, &mut stdout.lock()).await?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        for failure in &report.failures {
            eprintln!("error: {}: {}", failure.path.display(), failure.error);
        }
        eprintln!("{} file(s) failed", report.failures.len());
        Ok(ExitCode::FAILURE)
    }
}
