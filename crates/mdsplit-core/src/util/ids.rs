//! Slug utilities.
//!
//! Provides functions for turning file names and item titles into stable,
//! identifier-safe slugs. Search indexes typically accept only ASCII
//! alphanumerics, `-` and `_` in document IDs, so that is all a slug holds.

use std::path::Path;

/// Convert text into a lowercase, identifier-safe slug.
///
/// Performs the following transformations:
/// 1. Keeps ASCII alphanumerics and underscores, lowercased
/// 2. Replaces every other run of characters (including `-`) with one hyphen
/// 3. Drops leading and trailing hyphens
///
/// # Examples
///
/// ```
/// use mdsplit_core::util::ids::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("What is *this*?"), "what-is-this");
/// assert_eq!(slugify("snake_case -- Names"), "snake_case-names");
/// assert_eq!(slugify("¿Qué?"), "qu");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Compute a slug from a file path's stem.
///
/// Returns `None` if the path has no file stem.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use mdsplit_core::util::ids::slug_from_path;
///
/// assert_eq!(
///     slug_from_path(Path::new("/data/faq/Billing FAQ.md")),
///     Some("billing-faq".to_string())
/// );
/// assert_eq!(slug_from_path(Path::new("/")), None);
/// ```
pub fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(slugify)
}

/// Build the slug of an item from its file stem and title.
///
/// Empty parts are skipped so the result never starts or ends with `-`.
///
/// # Examples
///
/// ```
/// use mdsplit_core::util::ids::item_slug;
///
/// assert_eq!(item_slug("Billing FAQ", "How do refunds work?"), "billing-faq-how-do-refunds-work");
/// assert_eq!(item_slug("notes", "日本語"), "notes");
/// ```
pub fn item_slug(stem: &str, title: &str) -> String {
    [slugify(stem), slugify(title)]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
