//! Turning a commit's touched paths into validated local posts.
//!
//! For each touched markdown file under the blog root:
//!
//! 1. Missing from the working tree → [`DeletionNotice`], title recovered
//!    from the parent revision when possible.
//! 2. Present but without a title → skipped with a warning.
//! 3. Otherwise → [`LocalPost`].
//!
//! Output order follows discovery order.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use postsync_core::{frontmatter, DeletionNotice, FrontMatterError, LocalPost, Reporter};

use crate::changeset::ChangeSetReader;
use crate::error::{io_err, SyncError};

const MARKDOWN_EXTENSION: &str = "md";

/// Selects markdown files anywhere below the blog root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogFilter {
    root: PathBuf,
}

impl BlogFilter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
            && path != self.root
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
    }
}

/// A touched post file that was dropped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub source_path: PathBuf,
    pub reason: String,
}

/// Result of collecting one change set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    pub posts: Vec<LocalPost>,
    pub deletions: Vec<DeletionNotice>,
    pub skipped: Vec<SkippedFile>,
}

/// Reads touched post files from the working tree.
pub struct LocalPostCollector<'a> {
    changes: &'a dyn ChangeSetReader,
    reporter: &'a dyn Reporter,
    workdir: PathBuf,
    filter: BlogFilter,
}

impl<'a> LocalPostCollector<'a> {
    pub fn new(
        changes: &'a dyn ChangeSetReader,
        reporter: &'a dyn Reporter,
        workdir: impl Into<PathBuf>,
        filter: BlogFilter,
    ) -> Self {
        Self {
            changes,
            reporter,
            workdir: workdir.into(),
            filter,
        }
    }

    /// Reads the touched paths of `commit` and collects them.
    pub async fn collect_commit(&self, commit: &str) -> Result<Collected, SyncError> {
        let touched = self.changes.touched_paths(commit).await?;
        self.collect(commit, &touched).await
    }

    /// Collects the given touched paths of `commit`.
    pub async fn collect(
        &self,
        commit: &str,
        changed_paths: &[PathBuf],
    ) -> Result<Collected, SyncError> {
        let candidates: Vec<&PathBuf> = changed_paths
            .iter()
            .filter(|path| self.filter.matches(path))
            .collect();
        self.reporter.info(&format!(
            "Markdown posts found in commit: {}",
            candidates.len()
        ));

        let mut collected = Collected::default();
        for path in candidates {
            let on_disk = self.workdir.join(path);
            let exists = tokio::fs::try_exists(&on_disk)
                .await
                .map_err(|e| io_err(&on_disk, e))?;

            if !exists {
                let notice = self.deletion_notice(commit, path).await;
                self.report_deletion(&notice);
                collected.deletions.push(notice);
                continue;
            }

            let content = match tokio::fs::read_to_string(&on_disk).await {
                Ok(content) => content,
                Err(err) if err.kind() == ErrorKind::InvalidData => {
                    self.skip(&mut collected, path, "file is not valid UTF-8".to_owned());
                    continue;
                }
                Err(err) => return Err(io_err(&on_disk, err)),
            };

            match frontmatter::parse(&content) {
                Ok(fm) => {
                    tracing::debug!(path = %path.display(), title = %fm.title, "collected post");
                    collected.posts.push(LocalPost {
                        title: fm.title,
                        tags: fm.tags,
                        body: fm.body,
                        source_path: path.clone(),
                    });
                }
                Err(FrontMatterError::MissingTitle) => self.skip(
                    &mut collected,
                    path,
                    "front matter must contain a title".to_owned(),
                ),
                Err(err) => self.skip(&mut collected, path, err.to_string()),
            }
        }

        Ok(collected)
    }

    async fn deletion_notice(&self, commit: &str, path: &Path) -> DeletionNotice {
        let recovered_title = self
            .changes
            .content_at_parent(commit, path)
            .await
            .and_then(|content| frontmatter::parse_title(&content));
        DeletionNotice {
            source_path: path.to_path_buf(),
            recovered_title,
        }
    }

    fn report_deletion(&self, notice: &DeletionNotice) {
        self.reporter.info(&format!(
            "Post file deleted: {}. Remote posts are never deleted automatically; remove it on the platform by hand.",
            notice.source_path.display()
        ));
        if let Some(title) = &notice.recovered_title {
            self.reporter.info(&format!("Title of deleted post: {title}"));
        }
    }

    fn skip(&self, collected: &mut Collected, path: &Path, reason: String) {
        self.reporter
            .warn(&format!("Post skipped: {reason}. Path: {}", path.display()));
        collected.skipped.push(SkippedFile {
            source_path: path.to_path_buf(),
            reason,
        });
    }
}
