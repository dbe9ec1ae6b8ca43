//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{CONFIG_ENV_VAR, OutputFormat};

/// Split markdown files into titled entries with merged metadata.
///
/// Every level-1 heading starts a new entry. Front matter supplies the
/// base metadata of all entries in a file; fenced `toml metadata` or
/// `yaml metadata` blocks add to the entry they appear in.
#[derive(Parser, Debug)]
#[command(name = "mdsplit", author, version, about, long_about = None)]
pub struct Cli {
    /// Glob patterns of markdown files to process
    #[arg(required_unless_present = "print_config", value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Configuration file path
    #[arg(short, long, env = CONFIG_ENV_VAR, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Maximum number of files processed at once
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Stop at the first file that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Skip metadata blocks that cannot be applied instead of failing the file
    #[arg(long)]
    pub lenient: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
