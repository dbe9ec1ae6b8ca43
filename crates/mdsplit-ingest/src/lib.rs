//! File-level orchestration for mdsplit.
//!
//! - [`expand_patterns`] turns glob patterns into a file list
//! - [`Aggregator`] runs the split pipeline over many files concurrently,
//!   isolating failures per file
//! - [`IndexDocument`] flattens the resulting items into search index
//!   documents

pub mod aggregator;
pub mod documents;
pub mod patterns;

pub use aggregator::{
    Aggregator, FileFailure, IngestOptions, IngestReport, process_file, process_text,
};
pub use documents::{IndexDocument, to_documents};
pub use patterns::expand_patterns;
