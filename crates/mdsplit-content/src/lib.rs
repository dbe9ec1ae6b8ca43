//! Markdown segmentation engine for mdsplit.
//!
//! This crate turns one markdown document into a list of
//! [`Item`](mdsplit_core::Item)s:
//!
//! 1. [`markdown::extract_frontmatter`] strips the YAML or TOML front
//!    matter that becomes every item's base metadata
//! 2. [`markdown::parse_nodes`] parses the rest into top-level nodes
//! 3. [`segment::segment`] splits the nodes at level-1 headings, merging
//!    fenced metadata blocks into the item they appear in
//! 4. [`markdown::render_blocks`] and [`markdown::render_inlines`] turn
//!    each item's heading and body back into markdown
//!
//! [`split_document`] runs all four steps.
//!
//! # Example
//!
//! ```rust
//! use mdsplit_content::{split_document, SplitOptions};
//!
//! let items = split_document("# Only\nBody text.", &SplitOptions::default()).unwrap();
//! assert_eq!(items.len(), 1);
//! assert_eq!(items[0].title, "Only");
//! assert_eq!(items[0].body, "Body text.\n");
//! assert!(items[0].metadata.is_empty());
//! ```

pub mod document;
pub mod markdown;
pub mod metadata;
pub mod segment;

pub use document::{SplitOptions, split_document};
pub use metadata::MetadataFormat;
pub use segment::{Policy, SegmentOptions};
