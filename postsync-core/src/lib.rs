//! postsync core library: domain types, front matter, slugs, config, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes and value objects shared by every stage
//! - [`error`]: [`ConfigError`], [`FrontMatterError`]
//! - [`frontmatter`]: markdown front matter parsing
//! - [`slug`]: tag slug derivation
//! - [`config`]: run configuration resolved once at the boundary
//! - [`reporter`]: operator-facing status channel

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod reporter;
pub mod slug;
pub mod types;

pub use config::{FileConfig, RemoteConfig, RunConfig, RunInputs};
pub use error::{ConfigError, FrontMatterError};
pub use frontmatter::FrontMatter;
pub use reporter::{RecordedLine, RecordingReporter, Reporter, TracingReporter};
pub use slug::slugify;
pub use types::{
    DeletionNotice, Intent, LocalPost, PostUrl, PublicationId, RemotePost, RemotePostId, Tag,
};
