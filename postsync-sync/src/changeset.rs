//! Version-control change sets.
//!
//! [`ChangeSetReader`] is the seam the collector reads through;
//! [`GitChangeSet`] implements it by shelling out to `git`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::ChangeSetError;

/// Read access to one commit's touched paths and its parent revision.
#[async_trait]
pub trait ChangeSetReader: Send + Sync {
    /// Repository-relative paths touched by `commit`, in git's order.
    async fn touched_paths(&self, commit: &str) -> Result<Vec<PathBuf>, ChangeSetError>;

    /// Content of `path` in the parent of `commit`, if it existed there.
    async fn content_at_parent(&self, commit: &str, path: &Path) -> Option<String>;
}

/// `git` CLI backed change set reader rooted at a working tree.
#[derive(Debug, Clone)]
pub struct GitChangeSet {
    repo_root: PathBuf,
}

impl GitChangeSet {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    async fn git(&self, args: &[&str]) -> Result<String, ChangeSetError> {
        let output = Command::new("git")
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .await
            .map_err(ChangeSetError::Spawn)?;

        if !output.status.success() {
            return Err(ChangeSetError::Git {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ChangeSetReader for GitChangeSet {
    async fn touched_paths(&self, commit: &str) -> Result<Vec<PathBuf>, ChangeSetError> {
        let stdout = self
            .git(&["show", "--no-color", "--name-only", "--pretty=format:", commit])
            .await?;
        let paths = parse_name_only(&stdout);
        tracing::debug!(commit, touched = paths.len(), "read change set");
        Ok(paths)
    }

    async fn content_at_parent(&self, commit: &str, path: &Path) -> Option<String> {
        let spec = format!("{commit}^:{}", git_path(path));
        match self.git(&["show", &spec]).await {
            Ok(content) => Some(content),
            Err(err) => {
                tracing::debug!("parent revision unavailable for {}: {err}", path.display());
                None
            }
        }
    }
}

/// Non-blank lines of `git show --name-only`, first occurrence wins.
fn parse_name_only(stdout: &str) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(PathBuf::from)
        .collect()
}

/// Git object paths always use forward slashes.
fn git_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
