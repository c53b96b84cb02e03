//! Error types for postsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use postsync_core::ConfigError;
use postsync_remote::FetchError;

/// Failures of the version-control collaborator.
#[derive(Debug, Error)]
pub enum ChangeSetError {
    /// `git` could not be started at all.
    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    /// `git` ran and exited non-zero.
    #[error("git {args} failed: {stderr}")]
    Git { args: String, stderr: String },
}

/// Precondition failures that abort a whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("change set error: {0}")]
    ChangeSet(#[from] ChangeSetError),

    /// Publication id or remote catalog could not be obtained.
    #[error("remote catalog unavailable: {0}")]
    Fetch(#[from] FetchError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
