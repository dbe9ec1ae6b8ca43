//! Glob pattern expansion.

use std::collections::BTreeSet;
use std::path::PathBuf;

use mdsplit_core::{Error, Result};

/// Expand glob patterns into a sorted, de-duplicated list of files.
///
/// Matches that are not regular files (directories) are skipped, as are
/// entries that cannot be read; both are logged. A pattern that matches
/// nothing is not an error.
///
/// # Errors
///
/// Returns [`Error::Pattern`] for a syntactically invalid pattern.
pub fn expand_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries =
            glob::glob(pattern).map_err(|e| Error::pattern(pattern, e.msg.to_string()))?;

        let mut matched = 0usize;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    matched += 1;
                    files.insert(path);
                }
                Ok(path) => log::debug!("Skipping non-file match {}", path.display()),
                Err(e) => log::warn!("Cannot read {}: {}", e.path().display(), e.error()),
            }
        }

        if matched == 0 {
            log::warn!("Pattern '{pattern}' matched no files");
        }
    }

    Ok(files.into_iter().collect())
}
