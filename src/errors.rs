/*!
 * Error types for the shotnote application.
 *
 * Frame capture failures are recoverable and stay local to a single marker;
 * application errors abort the run.
 */

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while capturing a single frame
#[derive(Error, Debug)]
pub enum FrameError {
    /// The screenshot directory could not be created
    #[error("Failed to create screenshot directory {path:?}: {source}")]
    CreateOutputDir {
        /// Directory that was requested
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The capture executable could not be found
    #[error("Frame capture tool not found: {0:?}")]
    BinaryNotFound(PathBuf),

    /// The capture process could not be started
    #[error("Failed to start frame capture tool: {0}")]
    Spawn(std::io::Error),

    /// A screenshot left by an earlier run could not be removed
    #[error("Failed to remove previous screenshot {path:?}: {source}")]
    RemoveStaleOutput {
        /// Screenshot that was in the way
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The capture tool ran but reported a failure
    #[error("Frame capture tool exited with {status}: {stderr}")]
    ToolFailed {
        /// Exit status of the process
        status: ExitStatus,
        /// Filtered standard error output
        stderr: String,
    },

    /// The capture tool finished but did not leave an image behind
    #[error("Frame capture produced no file at {0:?}")]
    MissingOutput(PathBuf),
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No Markdown document in the working directory
    #[error("No .{extension} document found in {dir:?}")]
    NoDocument {
        /// Directory that was scanned
        dir: PathBuf,
        /// Extension that was searched for
        extension: String,
    },

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
