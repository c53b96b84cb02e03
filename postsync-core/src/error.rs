//! Error types for postsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving the run configuration.
///
/// All of these are precondition failures: the run stops before any
/// remote call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required run input was absent or blank.
    #[error("missing required setting `{field}` (pass --{field} or set {env})")]
    Missing {
        field: &'static str,
        env: &'static str,
    },

    /// The config file could not be read.
    #[error("cannot read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`crate::FileConfig`].
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly named config file does not exist.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// `page_size` must be at least one.
    #[error("page_size must be greater than zero")]
    ZeroPageSize,
}

/// Errors raised while reading a post's front matter.
///
/// These are recoverable: the collector skips the file and keeps going.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    /// The block between the `---` fences is not valid YAML.
    #[error("malformed front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The front matter has no usable `title`.
    #[error("front matter must contain a title")]
    MissingTitle,
}
