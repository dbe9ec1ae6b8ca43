//! Flattening item groups into search index documents.
//!
//! Each item becomes one flat JSON object: the item's metadata keys, then
//! the fixed fields `id`, `path`, `title` and `body`. Fixed fields win
//! over metadata keys of the same name.
//!
//! ```rust
//! use mdsplit_core::{Item, ItemGroup, Metadata};
//! use mdsplit_ingest::IndexDocument;
//!
//! let group = ItemGroup::new(
//!     "docs/Billing FAQ.md",
//!     vec![Item::new("How do refunds work?", "Ask us.\n", Metadata::new())],
//! );
//! let docs = IndexDocument::from_group(&group);
//! assert_eq!(docs[0].id(), "billing-faq-how-do-refunds-work");
//! ```

use std::collections::HashSet;

use mdsplit_core::{Item, ItemGroup, Metadata, Result, item_slug};
use serde::Serialize;
use serde_json::Value;

/// Fields every document carries regardless of metadata.
pub const RESERVED_FIELDS: [&str; 4] = ["id", "path", "title", "body"];

/// One flattened, index-ready document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndexDocument {
    fields: Metadata,
}

impl IndexDocument {
    /// Flatten every item of a group.
    ///
    /// IDs are slugs of the file stem and title. A slug already taken
    /// within the group gets the lowest free `-2`, `-3`, ... suffix, so
    /// every ID in the group is distinct.
    pub fn from_group(group: &ItemGroup) -> Vec<Self> {
        let mut taken: HashSet<String> = HashSet::new();
        let path = group.path().to_string_lossy();

        group
            .items
            .iter()
            .map(|item| {
                let id = unique_id(item_slug(group.stem(), &item.title), &mut taken);
                Self::from_item(id, &path, item)
            })
            .collect()
    }

    fn from_item(id: String, path: &str, item: &Item) -> Self {
        let mut fields: Metadata = item
            .metadata
            .iter()
            .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        fields.insert("id".to_string(), Value::String(id));
        fields.insert("path".to_string(), Value::String(path.to_string()));
        fields.insert("title".to_string(), Value::String(item.title.clone()));
        fields.insert("body".to_string(), Value::String(item.body.clone()));
        Self { fields }
    }

    /// The document ID.
    pub fn id(&self) -> &str {
        self.fields
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// All fields, metadata first.
    pub fn fields(&self) -> &Metadata {
        &self.fields
    }

    /// Serialize as a single line of JSON.
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }
}

fn unique_id(slug: String, taken: &mut HashSet<String>) -> String {
    let mut id = slug.clone();
    let mut n = 1;
    while taken.contains(&id) {
        n += 1;
        id = format!("{slug}-{n}");
    }
    taken.insert(id.clone());
    id
}

/// Flatten every group into documents, in group order.
pub fn to_documents(groups: &[ItemGroup]) -> Vec<IndexDocument> {
    groups.iter().flat_map(IndexDocument::from_group).collect()
}
