//! Markdown parsing into top-level block nodes.
//!
//! `pulldown-cmark` produces a flat event stream. This module groups the
//! events of each top-level block into a [`Node`], which is the unit the
//! segmenter works with:
//!
//! - [`Node::Heading`]: a heading with its level and inline events
//! - [`Node::FencedCode`]: a fenced code block with its info string split
//!   into a language and a tag
//! - [`Node::Other`]: any other block, kept as its raw events
//!
//! # Example
//!
//! ```rust
//! use mdsplit_content::markdown::{parse_nodes, MarkdownOptions, Node};
//! use pulldown_cmark::HeadingLevel;
//!
//! let nodes = parse_nodes("# Title\n\nText.\n", &MarkdownOptions::default());
//! assert_eq!(nodes.len(), 2);
//! assert!(matches!(&nodes[0], Node::Heading(h) if h.level == HeadingLevel::H1));
//! assert!(matches!(&nodes[1], Node::Other(_)));
//! ```

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use serde::{Deserialize, Serialize};

use crate::metadata::{METADATA_MARKER, MetadataFormat};

/// Markdown extensions enabled while parsing.
///
/// Defaults to the GitHub-flavoured set: tables, strikethrough and task
/// lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            task_lists: true,
        }
    }
}

impl MarkdownOptions {
    /// Plain CommonMark without extensions.
    pub fn commonmark() -> Self {
        Self {
            tables: false,
            strikethrough: false,
            task_lists: false,
        }
    }

    /// Convert to pulldown-cmark Options
    pub(crate) fn to_pulldown_options(self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        opts
    }
}

/// A top-level block of a markdown document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    /// ATX or setext heading.
    Heading(Heading<'a>),
    /// Fenced code block.
    FencedCode(FencedCode),
    /// Any other block (paragraph, list, table, quote, ...).
    Other(Vec<Event<'a>>),
}

/// A heading and its inline content.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading<'a> {
    /// Heading level.
    pub level: HeadingLevel,
    /// Inline events between the heading's start and end tags.
    pub inlines: Vec<Event<'a>>,
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedCode {
    /// First word of the info string.
    pub language: Option<String>,
    /// Remaining words of the info string.
    pub tag: Option<String>,
    /// Raw content of the block.
    pub text: String,
}

impl FencedCode {
    /// Create a fenced code block from its info string and content.
    pub fn new(info: &str, text: impl Into<String>) -> Self {
        let mut words = info.split_whitespace();
        let language = words.next().map(String::from);
        let rest: Vec<&str> = words.collect();
        let tag = (!rest.is_empty()).then(|| rest.join(" "));
        Self {
            language,
            tag,
            text: text.into(),
        }
    }

    /// The info string as it is rendered back.
    pub fn info(&self) -> String {
        match (&self.language, &self.tag) {
            (Some(language), Some(tag)) => format!("{language} {tag}"),
            (Some(language), None) => language.clone(),
            (None, _) => String::new(),
        }
    }

    /// The metadata format of this block, if it is a metadata block.
    ///
    /// A block is metadata when its language is `toml` or `yaml` and its
    /// tag contains the `metadata` marker.
    ///
    /// ```rust
    /// use mdsplit_content::markdown::FencedCode;
    /// use mdsplit_content::MetadataFormat;
    ///
    /// assert_eq!(FencedCode::new("toml metadata", "").metadata_format(), Some(MetadataFormat::Toml));
    /// assert_eq!(FencedCode::new("toml", "").metadata_format(), None);
    /// assert_eq!(FencedCode::new("rust metadata", "").metadata_format(), None);
    /// ```
    pub fn metadata_format(&self) -> Option<MetadataFormat> {
        let format = MetadataFormat::from_language(self.language.as_deref()?)?;
        self.tag
            .as_deref()?
            .split_whitespace()
            .any(|word| word == METADATA_MARKER)
            .then_some(format)
    }
}

enum BlockKind {
    Heading(HeadingLevel),
    Fenced(String),
    Other,
}

impl<'a> Node<'a> {
    /// Build a node from the balanced events of one top-level block.
    fn from_events(mut events: Vec<Event<'a>>) -> Self {
        let kind = match events.first() {
            Some(Event::Start(Tag::Heading { level, .. })) => BlockKind::Heading(*level),
            Some(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))) => {
                BlockKind::Fenced(info.to_string())
            }
            _ => BlockKind::Other,
        };

        match kind {
            BlockKind::Heading(level) => {
                let end = events.len().saturating_sub(1).max(1);
                let inlines = events.drain(1..end).collect();
                Node::Heading(Heading { level, inlines })
            }
            BlockKind::Fenced(info) => {
                let text: String = events
                    .iter()
                    .filter_map(|event| match event {
                        Event::Text(text) => Some(text.as_ref()),
                        _ => None,
                    })
                    .collect();
                Node::FencedCode(FencedCode::new(&info, text))
            }
            BlockKind::Other => Node::Other(events),
        }
    }

    /// Check whether this node is a heading of the given level.
    pub fn is_heading(&self, level: HeadingLevel) -> bool {
        matches!(self, Node::Heading(heading) if heading.level == level)
    }
}

/// Parse markdown into its top-level nodes, in document order.
pub fn parse_nodes<'a>(content: &'a str, options: &MarkdownOptions) -> Vec<Node<'a>> {
    let parser = Parser::new_ext(content, options.to_pulldown_options());
    let mut nodes = Vec::new();
    let mut block = Vec::new();
    let mut depth = 0usize;

    for event in parser {
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        block.push(event);
        if depth == 0 {
            nodes.push(Node::from_events(std::mem::take(&mut block)));
        }
    }

    if !block.is_empty() {
        nodes.push(Node::from_events(block));
    }

    nodes
}

// ============================================================================
// Tests
// ============================================================================
