//! The per-document pipeline: front matter, parsing and segmentation.

use mdsplit_core::{Item, Result};
use serde::{Deserialize, Serialize};

use crate::markdown::{MarkdownOptions, extract_frontmatter, parse_nodes};
use crate::segment::{SegmentOptions, segment};

/// Options for splitting one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitOptions {
    /// Markdown extensions.
    pub markdown: MarkdownOptions,
    /// Metadata block policies.
    pub segment: SegmentOptions,
}

/// Split a markdown document into items.
///
/// ```rust
/// use mdsplit_content::{split_document, SplitOptions};
/// use serde_json::json;
///
/// let text = "---\ntags: [a]\n---\n# Title1\nHello\n```toml metadata\nkey=1\n```\n# Title2\nWorld";
/// let items = split_document(text, &SplitOptions::default()).unwrap();
///
/// assert_eq!(items.len(), 2);
/// assert_eq!(items[0].title, "Title1");
/// assert_eq!(items[0].body, "Hello\n");
/// assert_eq!(serde_json::Value::Object(items[0].metadata.clone()), json!({"tags": ["a"], "key": 1}));
/// assert_eq!(items[1].body, "World\n");
/// assert_eq!(serde_json::Value::Object(items[1].metadata.clone()), json!({"tags": ["a"]}));
/// ```
pub fn split_document(text: &str, options: &SplitOptions) -> Result<Vec<Item>> {
    let (base, content) = extract_frontmatter(text)?.into_parts();
    let nodes = parse_nodes(content, &options.markdown);
    segment(nodes, &base, &options.segment)
}
