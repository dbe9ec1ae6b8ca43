//! Configuration file support.
//!
//! The config file is TOML with one section per stage:
//!
//! ```toml
//! [markdown]
//! tables = true
//! strikethrough = true
//! task_lists = true
//!
//! [segment]
//! orphan_metadata = "fail"   # or "skip"
//! invalid_metadata = "fail"  # or "skip"
//!
//! [ingest]
//! concurrency = 8
//! fail_fast = false
//!
//! [output]
//! format = "text"            # "json" or "documents"
//! ```
//!
//! Every key is optional. The file is looked up in order:
//!
//! 1. `--config <PATH>` (or `$MDSPLIT_CONFIG`), which must exist
//! 2. `<config dir>/mdsplit/config.toml`, used only if present

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use mdsplit_content::markdown::MarkdownOptions;
use mdsplit_content::{SegmentOptions, SplitOptions};
use mdsplit_core::{Error, Result};
use mdsplit_ingest::IngestOptions;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "MDSPLIT_CONFIG";

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable listing per file.
    #[default]
    Text,
    /// The item groups as one JSON array.
    Json,
    /// One flattened index document per line.
    Documents,
}

/// The `[output]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format.
    pub format: OutputFormat,
}

/// Complete mdsplit configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Markdown extensions.
    pub markdown: MarkdownOptions,
    /// Metadata block policies.
    pub segment: SegmentOptions,
    /// Batch settings.
    pub ingest: IngestOptions,
    /// Output settings.
    pub output: OutputConfig,
}

impl Config {
    /// The per-user config file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mdsplit").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// read if present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e.message())))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.message().to_string()))
    }

    /// Serialize to TOML, as printed by `--print-config`.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Apply command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(format) = cli.format {
            self.output.format = format;
        }
        if let Some(concurrency) = cli.concurrency {
            self.ingest.concurrency = Some(concurrency);
        }
        if cli.fail_fast {
            self.ingest.fail_fast = true;
        }
        if cli.lenient {
            self.segment = SegmentOptions::lenient();
        }
    }

    /// Options for splitting each document.
    pub fn split_options(&self) -> SplitOptions {
        SplitOptions {
            markdown: self.markdown,
            segment: self.segment,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
