//! Metadata parsing and merging.
//!
//! Metadata reaches an item from two places: the front matter of the file
//! (the base mapping every item starts from) and fenced blocks inside the
//! item tagged as metadata:
//!
//! ````markdown
//! # Refund policy
//!
//! ```toml metadata
//! category = "billing"
//! priority = 2
//! ```
//! ````
//!
//! Both YAML and TOML are converted into the JSON-shaped [`Metadata`]
//! mapping so that values from either source can be merged and serialized
//! the same way.
//!
//! # Merge semantics
//!
//! Merging is shallow: every key of the incoming mapping replaces the key
//! of the same name in the target, nested values included. Keys that only
//! exist in the target are left alone.

use std::fmt;

use mdsplit_core::{Error, Metadata, Result};
use serde_json::Value as JsonValue;

/// Marker word that turns a `toml`/`yaml` fenced block into metadata.
pub const METADATA_MARKER: &str = "metadata";

/// Structured data formats accepted for metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataFormat {
    /// TOML table.
    Toml,
    /// YAML mapping.
    Yaml,
}

impl MetadataFormat {
    /// Resolve a fenced code block language tag.
    ///
    /// ```rust
    /// use mdsplit_content::MetadataFormat;
    ///
    /// assert_eq!(MetadataFormat::from_language("toml"), Some(MetadataFormat::Toml));
    /// assert_eq!(MetadataFormat::from_language("yaml"), Some(MetadataFormat::Yaml));
    /// assert_eq!(MetadataFormat::from_language("rust"), None);
    /// ```
    pub fn from_language(language: &str) -> Option<Self> {
        match language {
            "toml" => Some(Self::Toml),
            "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Lowercase name of the format, as written in a language tag.
    pub fn name(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Yaml => "yaml",
        }
    }

    /// Parse an embedded metadata block.
    ///
    /// Fails with [`Error::MetadataBlock`] if the text is not valid for the
    /// format or does not describe a mapping.
    ///
    /// ```rust
    /// use mdsplit_content::MetadataFormat;
    ///
    /// let meta = MetadataFormat::Toml.parse("key = 1\ntags = [\"a\"]").unwrap();
    /// assert_eq!(meta["key"], 1);
    /// assert_eq!(meta["tags"][0], "a");
    /// ```
    pub fn parse(self, text: &str) -> Result<Metadata> {
        self.parse_mapping(text)
            .map_err(|message| Error::metadata_block(self.name(), message))
    }

    /// Parse text into a mapping, reporting failures as plain messages so
    /// callers can wrap them in the error variant that fits their context.
    pub(crate) fn parse_mapping(self, text: &str) -> std::result::Result<Metadata, String> {
        match self {
            Self::Toml => toml::from_str::<toml::Table>(text)
                .map(toml_table_to_metadata)
                .map_err(|e| e.message().to_string()),
            Self::Yaml => {
                if text.trim().is_empty() {
                    return Ok(Metadata::new());
                }
                let value = serde_yaml::from_str::<serde_yaml::Value>(text)
                    .map_err(|e| e.to_string())?;
                yaml_to_metadata(value)
            }
        }
    }
}

impl fmt::Display for MetadataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Merge `incoming` into `target`, overwriting keys of the same name.
///
/// ```rust
/// use mdsplit_content::metadata::merge;
/// use mdsplit_core::Metadata;
/// use serde_json::json;
///
/// let mut target: Metadata = serde_json::from_value(json!({"a": 1, "b": 2})).unwrap();
/// let incoming: Metadata = serde_json::from_value(json!({"b": 3, "c": 4})).unwrap();
/// merge(&mut target, incoming);
/// assert_eq!(serde_json::Value::Object(target), json!({"a": 1, "b": 3, "c": 4}));
/// ```
pub fn merge(target: &mut Metadata, incoming: Metadata) {
    target.extend(incoming);
}

// ============================================================================
// Value conversion
// ============================================================================

fn toml_table_to_metadata(table: toml::Table) -> Metadata {
    table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect()
}

fn toml_to_json(value: toml::Value) -> JsonValue {
    match value {
        toml::Value::String(s) => JsonValue::String(s),
        toml::Value::Integer(i) => JsonValue::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(f.to_string())),
        toml::Value::Boolean(b) => JsonValue::Bool(b),
        toml::Value::Datetime(dt) => JsonValue::String(dt.to_string()),
        toml::Value::Array(items) => JsonValue::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => JsonValue::Object(toml_table_to_metadata(table)),
    }
}

/// Convert a parsed YAML document into metadata.
///
/// A null document (empty front matter) is an empty mapping; any other
/// non-mapping document is rejected.
pub(crate) fn yaml_to_metadata(value: serde_yaml::Value) -> std::result::Result<Metadata, String> {
    match value {
        serde_yaml::Value::Null => Ok(Metadata::new()),
        serde_yaml::Value::Mapping(mapping) => yaml_mapping_to_metadata(mapping),
        serde_yaml::Value::Tagged(tagged) => yaml_to_metadata(tagged.value),
        other => Err(format!(
            "expected a mapping at the top level, found {}",
            yaml_kind(&other)
        )),
    }
}

fn yaml_mapping_to_metadata(
    mapping: serde_yaml::Mapping,
) -> std::result::Result<Metadata, String> {
    mapping
        .into_iter()
        .map(|(key, value)| Ok((yaml_key(key)?, yaml_to_json(value)?)))
        .collect()
}

fn yaml_key(key: serde_yaml::Value) -> std::result::Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(format!("unsupported mapping key of type {}", yaml_kind(&other))),
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> std::result::Result<JsonValue, String> {
    Ok(match value {
        serde_yaml::Value::Null => JsonValue::Null,
        serde_yaml::Value::Bool(b) => JsonValue::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(JsonValue::Number)
                    .unwrap_or_else(|| JsonValue::String(n.to_string()))
            }
        }
        serde_yaml::Value::String(s) => JsonValue::String(s),
        serde_yaml::Value::Sequence(items) => JsonValue::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<std::result::Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            JsonValue::Object(yaml_mapping_to_metadata(mapping)?)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

// ============================================================================
// Tests
// ============================================================================
