//! Items and item groups produced by segmentation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Metadata attached to an item.
///
/// Front matter and embedded metadata blocks (YAML or TOML) are converted
/// into this single JSON-shaped mapping before they are merged.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One logical entry of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Rendered inline markdown of the level-1 heading. Never empty.
    pub title: String,
    /// Rendered block markdown of everything under the heading.
    pub body: String,
    /// Base metadata merged with this item's own metadata blocks.
    pub metadata: Metadata,
}

impl Item {
    /// Create a new item.
    pub fn new(title: impl Into<String>, body: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            metadata,
        }
    }
}

/// The ordered items produced from one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGroup {
    /// Source file path.
    pub path: PathBuf,
    /// Items in the order their titles appear in the source.
    pub items: Vec<Item>,
}

impl ItemGroup {
    /// Create a group for the given source path.
    pub fn new(path: impl Into<PathBuf>, items: Vec<Item>) -> Self {
        Self {
            path: path.into(),
            items,
        }
    }

    /// The file stem of the source path, or an empty string.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// The source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of items in the group.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the source produced no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
