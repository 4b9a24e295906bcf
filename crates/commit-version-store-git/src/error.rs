//! Error types for repository inspection.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading commit history.
#[derive(Error, Debug)]
pub enum InspectError {
    /// No repository could be discovered from the given path.
    #[error("No git repository found from {}", .path.display())]
    NotARepository {
        /// Path the discovery started from.
        path: PathBuf,
        /// Underlying libgit2 error.
        source: git2::Error,
    },

    /// Git repository error.
    #[error("Git repository error")]
    GitError(#[from] git2::Error),

    /// The `git` binary could not be started.
    #[error("Failed to run {program}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The `git` binary exited unsuccessfully.
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        /// Rendered command line.
        command: String,
        /// Exit status description.
        status: String,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// Command output could not be interpreted.
    #[error("Unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput {
        /// Rendered command line.
        command: String,
        /// Raw trimmed output.
        output: String,
    },

    /// Commit timestamp could not be represented.
    #[error("Invalid commit time: {0}")]
    InvalidTime(String),

    /// Inspection is not possible for the stated reason.
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}
