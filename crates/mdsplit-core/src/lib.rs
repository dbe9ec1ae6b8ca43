//! mdsplit core: shared types, errors, and utilities.
//!
//! This crate provides the foundational types used across all mdsplit crates.
//! It has no internal mdsplit dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Items, item groups, and the metadata mapping
//! - [`util`]: Slug and ID utilities

pub mod error;
pub mod types;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use types::{Item, ItemGroup, Metadata};

// Convenience re-exports from util
pub use util::ids::{item_slug, slug_from_path, slugify};
