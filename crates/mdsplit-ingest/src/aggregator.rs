//! Running the split pipeline over files.
//!
//! Every file is processed on its own: it gets its own front matter, its
//! own parser run and its own segmenter state. A failing file is recorded
//! in the [`IngestReport`] and the rest of the batch carries on, unless the
//! aggregator is configured to fail fast.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mdsplit_ingest::{expand_patterns, Aggregator};
//!
//! let paths = expand_patterns(&["docs/**/*.md"])?;
//! let report = Aggregator::new().with_concurrency(4).run(paths).await?;
//!
//! for group in &report.groups {
//!     println!("{}: {} item(s)", group.path().display(), group.len());
//! }
//! for failure in &report.failures {
//!     eprintln!("{}: {}", failure.path.display(), failure.error);
//! }
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use mdsplit_content::{SplitOptions, split_document};
use mdsplit_core::{Error, ItemGroup, Result};
use serde::{Deserialize, Serialize};

/// Run the pipeline on in-memory text attributed to `path`.
pub fn process_text(path: impl Into<PathBuf>, text: &str, options: &SplitOptions) -> Result<ItemGroup> {
    let path = path.into();
    let items = split_document(text, options)?;
    log::debug!("Split {} into {} item(s)", path.display(), items.len());
    Ok(ItemGroup::new(path, items))
}

/// Read a file and run the pipeline on it.
///
/// Parsing runs on tokio's blocking pool so large documents do not stall
/// the async workers.
pub async fn process_file(path: impl AsRef<Path>, options: &SplitOptions) -> Result<ItemGroup> {
    let path = path.as_ref().to_path_buf();
    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| Error::io_with_path(e, &path))?;

    let options = *options;
    let worker_path = path.clone();
    tokio::task::spawn_blocking(move || process_text(worker_path, &text, &options))
        .await
        .map_err(|e| Error::task(&path, e.to_string()))?
}

/// A file that could not be processed.
#[derive(Debug)]
pub struct FileFailure {
    /// The file that failed.
    pub path: PathBuf,
    /// Why it failed.
    pub error: Error,
}

/// Outcome of an aggregation run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// One group per successfully processed file, in input order.
    pub groups: Vec<ItemGroup>,
    /// Files that failed, in input order.
    pub failures: Vec<FileFailure>,
}

impl IngestReport {
    /// Total number of items across all groups.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(ItemGroup::len).sum()
    }

    /// Whether every file was processed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Batch settings, as read from the `[ingest]` config section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestOptions {
    /// Maximum files in flight; defaults to the available parallelism.
    pub concurrency: Option<usize>,
    /// Abort the batch on the first failing file.
    pub fail_fast: bool,
}

/// Processes many files concurrently while keeping their order.
#[derive(Debug, Clone)]
pub struct Aggregator {
    options: SplitOptions,
    concurrency: usize,
    fail_fast: bool,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    /// Create an aggregator with default options.
    pub fn new() -> Self {
        Self {
            options: SplitOptions::default(),
            concurrency: default_concurrency(),
            fail_fast: false,
        }
    }

    /// Create an aggregator from split options and batch settings.
    pub fn from_options(options: SplitOptions, ingest: IngestOptions) -> Self {
        let mut aggregator = Self::new()
            .with_split_options(options)
            .with_fail_fast(ingest.fail_fast);
        if let Some(concurrency) = ingest.concurrency {
            aggregator = aggregator.with_concurrency(concurrency);
        }
        aggregator
    }

    /// Set the per-document split options.
    pub fn with_split_options(mut self, options: SplitOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the maximum number of files processed at once (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Stop at the first failing file instead of collecting failures.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// The configured concurrency.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Process every path and collect the results in input order.
    ///
    /// # Errors
    ///
    /// Only with fail-fast enabled: the error of the first failing file, in
    /// input order. Otherwise failures are returned in the report.
    pub async fn run<I, P>(&self, paths: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        log::info!(
            "Processing {} file(s), up to {} at a time",
            paths.len(),
            self.concurrency
        );

        let options = self.options;
        let mut results = futures::stream::iter(paths)
            .map(|path| async move {
                let result = process_file(&path, &options).await;
                (path, result)
            })
            .buffered(self.concurrency);

        let mut report = IngestReport::default();
        while let Some((path, result)) = results.next().await {
            match result {
                Ok(group) => report.groups.push(group),
                Err(error) if self.fail_fast => return Err(error),
                Err(error) => {
                    log::warn!("Failed to process {}: {error}", path.display());
                    report.failures.push(FileFailure { path, error });
                }
            }
        }

        log::info!(
            "Split {} file(s) into {} item(s) ({} failed)",
            report.groups.len(),
            report.item_count(),
            report.failures.len()
        );
        Ok(report)
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

// ============================================================================
// Tests
// ============================================================================
