//! Run configuration.
//!
//! # Sources
//!
//! ```text
//! flags / env           HASHNODE_HOST, HASHNODE_PAT, GITHUB_SHA   (required)
//! postsync.yaml         blog_root, endpoint, page_size            (optional)
//! ```
//!
//! Configuration is resolved exactly once, at the binary boundary, into a
//! [`RunConfig`] that is passed by reference to every stage. Nothing below
//! the boundary reads the environment.
//!
//! # API pattern
//!
//! File loading takes an explicit path (`load_at`); tests always pass a
//! `TempDir` path.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "postsync.yaml";
pub const DEFAULT_BLOG_ROOT: &str = "blog";
pub const DEFAULT_ENDPOINT: &str = "https://gql.hashnode.com";
pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub const HOST_ENV: &str = "HASHNODE_HOST";
pub const TOKEN_ENV: &str = "HASHNODE_PAT";
pub const COMMIT_ENV: &str = "GITHUB_SHA";

// ---------------------------------------------------------------------------
// 1. Config file
// ---------------------------------------------------------------------------

/// Optional settings read from `postsync.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Directory holding the posts, relative to the repository root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_root: Option<PathBuf>,
    /// GraphQL endpoint of the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Posts requested per listing page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl FileConfig {
    /// Loads the config file at `path`. The file must exist.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` if it exists, defaults otherwise.
    pub fn load_optional_at(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_at(path)
        } else {
            tracing::debug!("no config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Resolved configuration
// ---------------------------------------------------------------------------

/// Raw required inputs as collected by the binary (flags or env).
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    pub host: Option<String>,
    pub token: Option<String>,
    pub commit: Option<String>,
}

/// Everything needed to talk to the platform.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Publication host, e.g. `blog.example.dev`.
    pub host: String,
    /// Personal access token sent as the `Authorization` header.
    pub token: String,
    pub endpoint: String,
    pub page_size: u32,
}

impl RemoteConfig {
    /// Validates host and token and merges file settings.
    pub fn resolve(
        host: Option<String>,
        token: Option<String>,
        file: &FileConfig,
    ) -> Result<Self, ConfigError> {
        let host = required(host, "host", HOST_ENV)?;
        let token = required(token, "token", TOKEN_ENV)?;
        let page_size = file.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(Self {
            host,
            token,
            endpoint: file
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
            page_size,
        })
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Fully resolved configuration for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub remote: RemoteConfig,
    /// Commit whose change set is synced.
    pub commit: String,
    pub blog_root: PathBuf,
}

impl RunConfig {
    /// Checks every required input before any core logic runs.
    ///
    /// Host, token and commit are checked in that order; the first one
    /// missing is reported.
    pub fn resolve(inputs: RunInputs, file: &FileConfig) -> Result<Self, ConfigError> {
        let remote = RemoteConfig::resolve(inputs.host, inputs.token, file)?;
        let commit = required(inputs.commit, "commit", COMMIT_ENV)?;
        Ok(Self {
            remote,
            commit,
            blog_root: file
                .blog_root
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BLOG_ROOT)),
        })
    }
}

fn required(
    value: Option<String>,
    field: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing { field, env })
}
