//! Front matter extraction from markdown files.
//!
//! Front matter is metadata at the start of a markdown file. YAML front
//! matter is delimited by `---` lines, TOML front matter by `+++` lines:
//!
//! ```markdown
//! ---
//! category: faq
//! tags:
//!   - billing
//!   - refunds
//! ---
//!
//! # How do refunds work?
//!
//! The body of the document starts here.
//! ```
//!
//! The parsed mapping becomes the base metadata of every item in the file.
//!
//! # Usage
//!
//! ```rust
//! use mdsplit_content::markdown::extract_frontmatter;
//!
//! let content = "---\ncategory: faq\n---\n# Heading";
//! let result = extract_frontmatter(content).unwrap();
//!
//! assert!(result.has_frontmatter());
//! assert_eq!(result.get_str("category"), Some("faq"));
//! assert_eq!(result.body(), "# Heading");
//! ```

use mdsplit_core::{Error, Metadata, Result};

use crate::metadata::MetadataFormat;

/// Result of front matter extraction.
///
/// Contains the parsed metadata (empty if absent) and the body content
/// after the closing delimiter.
#[derive(Debug, Clone)]
pub struct FrontmatterResult<'a> {
    /// Parsed front matter mapping.
    metadata: Metadata,
    /// Body content after the front matter.
    body: &'a str,
    /// Format of the front matter block, if one was found.
    format: Option<MetadataFormat>,
}

impl<'a> FrontmatterResult<'a> {
    fn with_frontmatter(metadata: Metadata, body: &'a str, format: MetadataFormat) -> Self {
        Self {
            metadata,
            body,
            format: Some(format),
        }
    }

    fn without_frontmatter(body: &'a str) -> Self {
        Self {
            metadata: Metadata::new(),
            body,
            format: None,
        }
    }

    /// Check if a delimited front matter block was found.
    pub fn has_frontmatter(&self) -> bool {
        self.format.is_some()
    }

    /// Format of the front matter block, if one was found.
    pub fn format(&self) -> Option<MetadataFormat> {
        self.format
    }

    /// The parsed metadata mapping.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Get the body content (everything after the front matter).
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Split into the metadata mapping and the body.
    pub fn into_parts(self) -> (Metadata, &'a str) {
        (self.metadata, self.body)
    }

    /// Get a string field from the front matter.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key)?.as_str()
    }
}

/// Extract front matter from markdown content.
///
/// # Behavior
///
/// - No opening delimiter on the first line: empty metadata, body as-is
/// - Opening delimiter but no closing line: same as no front matter (warns)
/// - Delimited block that is not a valid mapping: [`Error::FrontMatter`]
/// - Otherwise: the parsed mapping and the text after the closing line
///
/// # Example
///
/// ```rust
/// use mdsplit_content::markdown::extract_frontmatter;
///
/// // TOML front matter
/// let content = "+++\nweight = 3\n+++\n# Heading";
/// let result = extract_frontmatter(content).unwrap();
/// assert_eq!(result.metadata()["weight"], 3);
///
/// // Without front matter
/// let content = "# Just Markdown";
/// let result = extract_frontmatter(content).unwrap();
/// assert!(!result.has_frontmatter());
/// assert_eq!(result.body(), "# Just Markdown");
/// ```
pub fn extract_frontmatter(content: &str) -> Result<FrontmatterResult<'_>> {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);

    // The opening delimiter must be a complete first line
    let Some((first_line, rest)) = text.split_once('\n') else {
        return Ok(FrontmatterResult::without_frontmatter(text));
    };

    let (format, closers): (MetadataFormat, &[&str]) = match first_line.trim_end() {
        "---" => (MetadataFormat::Yaml, &["---", "..."][..]),
        "+++" => (MetadataFormat::Toml, &["+++"][..]),
        _ => return Ok(FrontmatterResult::without_frontmatter(text)),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if closers.iter().any(|closer| *closer == trimmed) {
            let raw = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let metadata = format
                .parse_mapping(raw)
                .map_err(|message| Error::front_matter(format!("{format}: {message}")))?;
            return Ok(FrontmatterResult::with_frontmatter(metadata, body, format));
        }
        offset += line.len();
    }

    log::warn!("Front matter opening delimiter found but no closing delimiter");
    Ok(FrontmatterResult::without_frontmatter(text))
}

// ============================================================================
// Tests
// ============================================================================
