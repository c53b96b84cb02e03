//! # postsync-sync
//!
//! Change-set collection, reconciliation and run orchestration.
//!
//! Call [`pipeline::run`] to sync one commit's posts to the platform, or use
//! the stages directly: [`LocalPostCollector`] → [`reconcile`].

pub mod changeset;
pub mod collector;
pub mod error;
pub mod pipeline;
pub mod reconcile;

pub use changeset::{ChangeSetReader, GitChangeSet};
pub use collector::{BlogFilter, Collected, LocalPostCollector, SkippedFile};
pub use error::{ChangeSetError, SyncError};
pub use pipeline::{Action, IntentOutcome, RunContext, RunMode, RunReport};
pub use reconcile::{duplicate_remote_titles, reconcile};
