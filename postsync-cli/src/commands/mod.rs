pub mod console;
pub mod remote;
pub mod slug;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use postsync_core::config::{DEFAULT_CONFIG_FILE, HOST_ENV, TOKEN_ENV};
use postsync_core::FileConfig;

/// Platform connection flags shared by `sync` and `remote`.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Publication host, e.g. `blog.example.dev`.
    #[arg(long, env = HOST_ENV)]
    pub host: Option<String>,

    /// Personal access token.
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Settings file [default: postsync.yaml in the repository, if present].
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    /// An explicit `--config` must exist; the default file is optional.
    pub fn file_config(&self, repo: &Path) -> Result<FileConfig> {
        let loaded = match &self.config {
            Some(path) => FileConfig::load_at(path),
            None => FileConfig::load_optional_at(&repo.join(DEFAULT_CONFIG_FILE)),
        };
        Ok(loaded?)
    }
}

/// Multi-threaded runtime for the async commands.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
