//! Shared fixtures for the aggregation tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A temporary directory of markdown files.
pub struct DocTree {
    dir: TempDir,
}

impl DocTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Writes a file relative to the tree root and returns its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// A glob pattern rooted at the tree.
    pub fn pattern(&self, glob: &str) -> String {
        format!("{}/{glob}", self.dir.path().display())
    }
}

/// A document with front matter and two items.
pub const GUIDE: &str = "---\nsection: guide\n---\n\
# Install\n\
Run the installer.\n\
```toml metadata\n\
order = 1\n\
```\n\
# Configure\n\
Edit the config file.\n";

/// A document whose metadata block precedes every heading.
pub const ORPHAN: &str = "```yaml metadata\nk: v\n```\n# Late\ntext\n";
