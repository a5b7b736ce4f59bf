//! Error types for a run. Every variant is recoverable: it costs one image or
//! one (image, plugin) pair, never the whole run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    /// The summary file for an image could not be created or headed.
    #[error("Error opening analysis file ({}): {source}", path.display())]
    ArtifactCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The summary subdirectory could not be created.
    #[error("Error creating summary directory ({}): {source}", path.display())]
    SummaryDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The external tool could not be launched.
    #[error("Error running command {}: {source}", tool.display())]
    InvocationStart {
        tool: PathBuf,
        source: std::io::Error,
    },

    /// The external tool was launched but waiting on it failed.
    #[error("Error waiting for command {}: {source}", tool.display())]
    InvocationWait {
        tool: PathBuf,
        source: std::io::Error,
    },

    /// A plugin output file exists but could not be read.
    #[error("Error reading plugin data file ({}): {source}", path.display())]
    CollectionRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Appending to an already open summary failed.
    #[error("Error writing analysis file ({}): {source}", path.display())]
    SummaryWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for run steps.
pub type RunResult<T> = Result<T, RunError>;
