//! Splitting a node sequence into items at level-1 headings.
//!
//! The segmenter is a small state machine folded over the top-level nodes
//! of one document:
//!
//! - a level-1 heading flushes the open item (if any) and opens a new one
//!   whose metadata starts as a copy of the document's base metadata
//! - a fenced `toml`/`yaml` block tagged `metadata` is merged into the open
//!   item's metadata and never reaches the body
//! - every other node is appended to the open item's body
//!
//! Nodes seen while no item is open (the preamble) are dropped.
//!
//! # Example
//!
//! ```rust
//! use mdsplit_content::markdown::{parse_nodes, MarkdownOptions};
//! use mdsplit_content::segment::{segment, SegmentOptions};
//! use mdsplit_core::Metadata;
//!
//! let nodes = parse_nodes("# One\nfirst\n# Two\nsecond\n", &MarkdownOptions::default());
//! let items = segment(nodes, &Metadata::new(), &SegmentOptions::default()).unwrap();
//!
//! assert_eq!(items.len(), 2);
//! assert_eq!(items[0].title, "One");
//! assert_eq!(items[1].body, "second\n");
//! ```

use mdsplit_core::{Error, Item, Metadata, Result};
use pulldown_cmark::HeadingLevel;
use serde::{Deserialize, Serialize};

use crate::markdown::{Node, render_blocks, render_inlines};
use crate::metadata::{MetadataFormat, merge};

/// What to do when a metadata block cannot be applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Abort processing of the document with an error.
    #[default]
    Fail,
    /// Drop the block, log a warning and continue.
    Skip,
}

/// Policies for metadata blocks the segmenter cannot apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegmentOptions {
    /// A metadata block appears while no item is open: before the first
    /// level-1 heading, or after one with an empty title.
    pub orphan_metadata: Policy,
    /// A metadata block does not parse as a mapping.
    pub invalid_metadata: Policy,
}

impl SegmentOptions {
    /// Options that skip every unusable metadata block.
    pub fn lenient() -> Self {
        Self {
            orphan_metadata: Policy::Skip,
            invalid_metadata: Policy::Skip,
        }
    }
}

/// The item currently being accumulated.
#[derive(Debug)]
struct OpenItem<'a> {
    title: String,
    metadata: Metadata,
    body: Vec<Node<'a>>,
}

/// Segmentation state threaded through the node sequence.
#[derive(Debug)]
pub struct Segmenter<'a, 'b> {
    base: &'b Metadata,
    options: &'b SegmentOptions,
    current: Option<OpenItem<'a>>,
    items: Vec<Item>,
    dropped: usize,
}

impl<'a, 'b> Segmenter<'a, 'b> {
    /// Create a segmenter with no open item.
    pub fn new(base: &'b Metadata, options: &'b SegmentOptions) -> Self {
        Self {
            base,
            options,
            current: None,
            items: Vec::new(),
            dropped: 0,
        }
    }

    /// Feed the next top-level node.
    pub fn advance(mut self, node: Node<'a>) -> Result<Self> {
        match node {
            Node::Heading(heading) if heading.level == HeadingLevel::H1 => {
                self.flush();
                self.open(render_inlines(&heading.inlines));
            }
            Node::FencedCode(code) => match code.metadata_format() {
                Some(format) => self.merge_metadata(format, &code.text)?,
                None => self.accumulate(Node::FencedCode(code)),
            },
            other => self.accumulate(other),
        }
        Ok(self)
    }

    /// Start a new item with a fresh copy of the base metadata.
    fn open(&mut self, title: String) {
        if title.trim().is_empty() {
            log::debug!("Level-1 heading with an empty title; content until the next heading is dropped");
            return;
        }
        self.current = Some(OpenItem {
            title,
            metadata: self.base.clone(),
            body: Vec::new(),
        });
    }

    fn accumulate(&mut self, node: Node<'a>) {
        match self.current.as_mut() {
            Some(item) => item.body.push(node),
            None => self.dropped += 1,
        }
    }

    fn merge_metadata(&mut self, format: MetadataFormat, text: &str) -> Result<()> {
        let Some(item) = self.current.as_mut() else {
            return match self.options.orphan_metadata {
                Policy::Fail => Err(Error::structural(format!(
                    "{format} metadata block appears outside of any item"
                ))),
                Policy::Skip => {
                    log::warn!("Skipping {format} metadata block outside of any item");
                    Ok(())
                }
            };
        };

        match format.parse(text) {
            Ok(parsed) => {
                merge(&mut item.metadata, parsed);
                Ok(())
            }
            Err(err) => match self.options.invalid_metadata {
                Policy::Fail => Err(err),
                Policy::Skip => {
                    log::warn!("Skipping metadata block in item '{}': {err}", item.title);
                    Ok(())
                }
            },
        }
    }

    /// Close the open item, if any, and append it to the result.
    fn flush(&mut self) {
        if let Some(open) = self.current.take() {
            let body = render_blocks(&open.body);
            self.items.push(Item::new(open.title, body, open.metadata));
        }
    }

    /// Number of items completed so far.
    pub fn completed(&self) -> usize {
        self.items.len()
    }

    /// Title of the open item, if one is open.
    pub fn current_title(&self) -> Option<&str> {
        self.current.as_ref().map(|item| item.title.as_str())
    }

    /// Flush the open item and return every item in document order.
    pub fn finish(mut self) -> Vec<Item> {
        self.flush();
        if self.dropped > 0 {
            log::debug!("Dropped {} node(s) outside of any item", self.dropped);
        }
        self.items
    }
}

/// Segment a node sequence into items.
pub fn segment<'a>(
    nodes: impl IntoIterator<Item = Node<'a>>,
    base: &Metadata,
    options: &SegmentOptions,
) -> Result<Vec<Item>> {
    let segmenter = nodes
        .into_iter()
        .try_fold(Segmenter::new(base, options), Segmenter::advance)?;
    Ok(segmenter.finish())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::markdown::{MarkdownOptions, parse_nodes};
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn meta(value: Value) -> Metadata {
        serde_json::from_value(value).unwrap()
    }

    fn split(content: &str, base: &Metadata, options: &SegmentOptions) -> Result<Vec<Item>> {
        segment(parse_nodes(content, &MarkdownOptions::default()), base, options)
    }

    fn split_default(content: &str) -> Vec<Item> {
        split(content, &Metadata::new(), &SegmentOptions::default()).unwrap()
    }

    // ------------------------------------------------------------------------
    // State transitions
    // ------------------------------------------------------------------------

    #[test]
    fn test_segmenter_transitions() {
        let base = meta(json!({"k": 0}));
        let options = SegmentOptions::default();
        let mut nodes = parse_nodes("intro\n# A\ntext\n# B\n", &MarkdownOptions::default()).into_iter();

        let state = Segmenter::new(&base, &options);
        assert_eq!(state.current_title(), None);

        let state = state.advance(nodes.next().unwrap()).unwrap();
        assert_eq!(state.current_title(), None);

        let state = state.advance(nodes.next().unwrap()).unwrap();
        assert_eq!(state.current_title(), Some("A"));
        assert_eq!(state.completed(), 0);

        let state = state.advance(nodes.next().unwrap()).unwrap();
        let state = state.advance(nodes.next().unwrap()).unwrap();
        assert_eq!(state.current_title(), Some("B"));
        assert_eq!(state.completed(), 1);

        let items = state.finish();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].body, "text\n");
        assert_eq!(items[1].body, "");
        assert_eq!(items[1].metadata, base);
    }

    // ------------------------------------------------------------------------
    // Boundaries
    // ------------------------------------------------------------------------

    #[test]
    fn test_no_headings_no_items() {
        assert!(split_default("Just text.\n\n## Subheading\n").is_empty());
        assert!(split_default("").is_empty());
    }

    #[test]
    fn test_preamble_dropped() {
        let items = split_default("Intro paragraph.\n\n# First\nBody.\n");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First");
        assert_eq!(items[0].body, "Body.\n");
    }

    #[test]
    fn test_lower_headings_are_body() {
        let items = split_default("# Top\n## Sub\ntext\n### Deeper\n");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].body, "## Sub\n\ntext\n\n### Deeper\n");
    }

    #[test]
    fn test_setext_level_one_is_boundary() {
        let items = split_default("First\n=====\na\n\nSecond\n======\nb\n");
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second"]);
    }

    #[test]
    fn test_empty_title_closes_item_without_opening() {
        let items = split_default("# Kept\nkept body\n#\ndropped\n# Next\nnext body\n");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].body, "kept body\n");
        assert_eq!(items[1].title, "Next");
    }

    #[test]
    fn test_ordinary_code_block_stays_in_body() {
        let items = split_default("# T\n```toml\nkey = 1\n```\n");
        assert_eq!(items[0].body, "```toml\nkey = 1\n```\n");
        assert!(items[0].metadata.is_empty());
    }

    // ------------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------------

    #[test]
    fn test_metadata_block_removed_from_body() {
        let items = split_default("# T\nHello\n```toml metadata\nkey=1\n```\n");
        assert_eq!(items[0].body, "Hello\n");
        assert_eq!(Value::Object(items[0].metadata.clone()), json!({"key": 1}));
    }

    #[test]
    fn test_block_overrides_base() {
        let base = meta(json!({"k": "base", "other": true}));
        let items = split(
            "# T\n```yaml metadata\nk: item\n```\n",
            &base,
            &SegmentOptions::default(),
        )
        .unwrap();
        assert_eq!(
            Value::Object(items[0].metadata.clone()),
            json!({"k": "item", "other": true})
        );
    }

    #[test]
    fn test_later_block_wins() {
        let items = split_default("# T\n```toml metadata\nk = 1\n```\n```yaml metadata\nk: 2\n```\n");
        assert_eq!(items[0].metadata["k"], json!(2));
    }

    #[test]
    fn test_no_leak_between_items() {
        let base = meta(json!({"tags": ["a"]}));
        let items = split(
            "# One\n```toml metadata\nkey = 1\n```\n# Two\nWorld\n",
            &base,
            &SegmentOptions::default(),
        )
        .unwrap();
        assert_eq!(items[0].metadata["key"], json!(1));
        assert_eq!(items[1].metadata, base);
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_orphan_metadata_fails_by_default() {
        let err = split(
            "```toml metadata\nk = 1\n```\n# T\n",
            &Metadata::new(),
            &SegmentOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::StructuralPrecondition { .. }));
    }

    #[test]
    fn test_metadata_after_empty_title_is_orphan() {
        let text = "# Kept\nkept body\n#\n```toml metadata\nk = 1\n```\n# Next\n";
        let err = split(text, &Metadata::new(), &SegmentOptions::default()).unwrap_err();
        assert!(matches!(err, Error::StructuralPrecondition { .. }));
        assert!(err.to_string().contains("outside of any item"));

        let items = split(text, &Metadata::new(), &SegmentOptions::lenient()).unwrap();
        let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, ["Kept", "Next"]);
        assert!(items.iter().all(|item| item.metadata.is_empty()));
    }

    #[test]
    fn test_orphan_metadata_skipped() {
        let options = SegmentOptions {
            orphan_metadata: Policy::Skip,
            ..SegmentOptions::default()
        };
        let items = split("```toml metadata\nk = 1\n```\n# T\n", &Metadata::new(), &options).unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].metadata.is_empty());
    }

    #[test]
    fn test_invalid_metadata_fails_by_default() {
        let err = split(
            "# T\n```toml metadata\nk = \n```\n",
            &Metadata::new(),
            &SegmentOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MetadataBlock { .. }));
    }

    #[test]
    fn test_invalid_metadata_skip_keeps_prior_state() {
        let content = "# T\n```toml metadata\nk = 1\n```\n```toml metadata\nk = \n```\nafter\n";
        let items = split(content, &Metadata::new(), &SegmentOptions::lenient()).unwrap();
        assert_eq!(items[0].metadata["k"], json!(1));
        assert_eq!(items[0].body, "after\n");
    }

    #[test]
    fn test_options_deserialize() {
        let options: SegmentOptions = toml::from_str("orphan_metadata = \"skip\"").unwrap();
        assert_eq!(options.orphan_metadata, Policy::Skip);
        assert_eq!(options.invalid_metadata, Policy::Fail);
        assert!(toml::from_str::<SegmentOptions>("unknown = 1").is_err());
    }

    // ------------------------------------------------------------------------
    // Property tests
    // ------------------------------------------------------------------------

    fn section() -> impl Strategy<Value = (String, String)> {
        ("[A-Za-z][A-Za-z0-9 ]{0,15}", "[a-z]{1,10}( [a-z]{1,10}){0,4}")
            .prop_map(|(title, body)| (title.trim_end().to_string(), body))
    }

    proptest! {
        #[test]
        fn n_headings_yield_n_items_in_order(sections in proptest::collection::vec(section(), 0..8)) {
            let content: String = sections
                .iter()
                .map(|(title, body)| format!("# {title}\n\n{body}\n\n## sub\n\n"))
                .collect();
            let items = split_default(&content);

            prop_assert_eq!(items.len(), sections.len());
            for (item, (title, body)) in items.iter().zip(&sections) {
                prop_assert_eq!(&item.title, title);
                prop_assert_eq!(&item.body, &format!("{body}\n\n## sub\n"));
            }
        }
    }
}
