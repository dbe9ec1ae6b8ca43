//! Error types for mdsplit.

use std::path::{Path, PathBuf};

/// Errors that can occur while splitting markdown documents into items.
///
/// The first three variants are content errors: they abort the processing
/// of one file but leave the rest of a batch untouched.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The leading front matter block is delimited but not valid data.
    #[error("Front matter parse error: {message}")]
    FrontMatter {
        /// What went wrong
        message: String,
    },

    /// A fenced metadata block holds text that is invalid for its format.
    #[error("Metadata block parse error ({format}): {message}")]
    MetadataBlock {
        /// Declared format of the block (`toml` or `yaml`)
        format: String,
        /// What went wrong
        message: String,
    },

    /// A metadata block appeared while no item was open.
    #[error("Structural precondition violated: {message}")]
    StructuralPrecondition {
        /// What was out of place
        message: String,
    },

    /// I/O error while reading a source file.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A blocking worker processing one file panicked or was cancelled.
    #[error("Worker task failed for {}: {message}", path.display())]
    Task {
        /// File the worker was processing
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Invalid file glob pattern.
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern {
        /// The offending pattern
        pattern: String,
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type alias for mdsplit operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether a batch may carry on after this error.
    ///
    /// Content and I/O errors are scoped to a single file. Pattern and
    /// configuration errors affect the whole run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::FrontMatter { .. } => true,
            Error::MetadataBlock { .. } => true,
            Error::StructuralPrecondition { .. } => true,
            Error::Io { .. } => true,
            Error::Task { .. } => true,
            Error::Pattern { .. } => false,
            Error::Config { .. } => false,
            Error::Serialization(_) => false,
        }
    }

    /// Creates a new front matter error.
    pub fn front_matter<S: Into<String>>(message: S) -> Self {
        Error::FrontMatter {
            message: message.into(),
        }
    }

    /// Creates a new metadata block error for the given format.
    pub fn metadata_block<F, M>(format: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::MetadataBlock {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Creates a new structural precondition error.
    pub fn structural<S: Into<String>>(message: S) -> Self {
        Error::StructuralPrecondition {
            message: message.into(),
        }
    }

    /// Creates a new I/O error tied to a path.
    pub fn io_with_path(source: std::io::Error, path: &Path) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a new worker task error for a file.
    pub fn task<S: Into<String>>(path: &Path, message: S) -> Self {
        Error::Task {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Creates a new pattern error.
    pub fn pattern<P, M>(pattern: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Error::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
