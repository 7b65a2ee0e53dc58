//! Bulk loading error module.
//!
//! Errors raised while reading prefix databases and paired test files.
//! Every malformed line is surfaced with its 1-based line number.

use std::path::PathBuf;
use thiserror::Error;

use crate::data_structures::radix_tree::RadixTreeError;

/// Errors that can occur while loading or verifying prefix files.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// The file being read
        path: PathBuf,
        /// The underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// A line failed to parse or insert.
    #[error("line {line}: {source}")]
    Line {
        /// 1-based line number
        line: usize,
        /// What went wrong on that line
        #[source]
        source: RadixTreeError,
    },

    /// The tree could not be sized for the file.
    #[error(transparent)]
    Tree(#[from] RadixTreeError),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn line(line: usize, source: RadixTreeError) -> Self {
        Self::Line { line, source }
    }
}
