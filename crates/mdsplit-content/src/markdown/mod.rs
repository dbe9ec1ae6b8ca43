//! Markdown handling: front matter, parsing into nodes, and rendering
//! nodes back to canonical markdown.

mod escape;
pub mod frontmatter;
pub mod parser;
pub mod render;

pub use frontmatter::{FrontmatterResult, extract_frontmatter};
pub use parser::{FencedCode, Heading, MarkdownOptions, Node, parse_nodes};
pub use render::{render_blocks, render_inlines};
