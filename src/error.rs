//! Error types for extraction runs.
//!
//! Every failure that aborts an extraction pass is an `ExtractError`. The
//! variants name the offending path so the CLI and the HTTP front end can
//! report something actionable instead of aborting the process.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing a package directory or rendering output.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error in {}:{line}:{column}: {message}", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{}: expected 'package' clause", .path.display())]
    MissingPackage { path: PathBuf },

    #[error("failed to load Go grammar: {0}")]
    Language(String),

    #[error("invalid exclude pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid package path {0:?}")]
    InvalidPackagePath(String),

    #[error("failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ExtractError {
    /// Whether this error was caused by the request rather than the file system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractError::InvalidPackagePath(_))
    }
}
