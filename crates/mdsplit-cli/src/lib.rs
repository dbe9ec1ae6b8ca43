//! # mdsplit-cli
//!
//! The `mdsplit` command: expands glob patterns, splits every matched
//! markdown file into entries and prints them as a text listing, a JSON
//! array or newline-delimited index documents.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

use std::io::Write;

use anyhow::{Context, Result};
use mdsplit_ingest::{Aggregator, IngestReport, expand_patterns};

pub use cli::Cli;
pub use config::{Config, OutputFormat};

/// Run the command with parsed arguments, printing results to `out`.
///
/// With `--print-config` only the effective configuration is printed.
/// Returns the report so the caller can pick an exit status.
pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<IngestReport> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(cli);

    if cli.print_config {
        out.write_all(config.to_toml_string()?.as_bytes())?;
        out.flush()?;
        return Ok(IngestReport::default());
    }

    let paths = expand_patterns(&cli.patterns)?;
    tracing::info!(files = paths.len(), "Expanded {} pattern(s)", cli.patterns.len());

    let aggregator = Aggregator::from_options(config.split_options(), config.ingest);
    let report = aggregator.run(paths).await?;

    output::write_groups(out, &report.groups, config.output.format)?;
    out.flush()?;
    Ok(report)
}
