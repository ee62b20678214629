//! Error handling module
//!
//! This module provides unified error handling for the diff-chunk-filter application.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the application
#[derive(Debug, ThisError)]
pub enum Error {
    /// IO-related errors without further context
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The input could not be opened
    #[error("Failed to open input '{}': {source}", .path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The output (or its temporary sibling) could not be created
    #[error("Failed to create output '{}': {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The finished output could not be moved into place
    #[error("Failed to persist output '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading the input stream failed mid-run
    #[error("Failed to read input: {0}")]
    Read(#[source] io::Error),
    /// Writing the output stream failed mid-run
    #[error("Failed to write output: {0}")]
    Write(#[source] io::Error),
}

impl Error {
    /// Whether this error was caused by the reader of our output going away
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Error::Write(e) | Error::Io(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }
}
