//! Shared sync pipeline entrypoint.
//!
//! ## Run order
//!
//! 1. Collect local posts, deletions and skips from the commit.
//! 2. Fetch the publication id (precondition).
//! 3. List the complete remote catalog (precondition).
//! 4. Reconcile into intents.
//! 5. Apply intents one at a time, in order. A failing intent is reported
//!    and the run moves on.
//!
//! Steps 2 and 3 abort the run before any mutation when they fail.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use postsync_core::{ConfigError, DeletionNotice, Intent, PostUrl, Reporter, RunConfig};
use postsync_remote::{GraphqlTransport, PageSize, RemoteMutator, RemotePostLister};

use crate::changeset::ChangeSetReader;
use crate::collector::{BlogFilter, LocalPostCollector, SkippedFile};
use crate::error::SyncError;
use crate::reconcile::{duplicate_remote_titles, reconcile};

/// Whether intents are sent to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Apply,
    /// Reconcile and report, never mutate.
    DryRun,
}

/// What happened (or would happen) to one local post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Created,
    Updated,
    WouldCreate,
    WouldUpdate,
}

/// Outcome of one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentOutcome {
    pub title: String,
    pub source_path: PathBuf,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<PostUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntentOutcome {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub commit: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u128,
    pub dry_run: bool,
    pub outcomes: Vec<IntentOutcome>,
    pub deletions: Vec<DeletionNotice>,
    pub skipped: Vec<SkippedFile>,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn count(&self, action: Action) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.action == action && !o.is_failure())
            .count()
    }
}

/// Collaborators for one run.
pub struct RunContext<'a> {
    pub config: &'a RunConfig,
    /// Working tree the change set's paths are relative to.
    pub workdir: &'a Path,
    pub transport: &'a dyn GraphqlTransport,
    pub changes: &'a dyn ChangeSetReader,
    pub reporter: &'a dyn Reporter,
}

/// Run the sync pipeline for the configured commit.
///
/// Returns `Err` only for precondition failures. Per-post mutation failures
/// are recorded in the report.
pub async fn run(ctx: &RunContext<'_>, mode: RunMode) -> Result<RunReport, SyncError> {
    let started_at = Utc::now();
    let clock = Instant::now();
    let config = ctx.config;
    let page_size = PageSize::new(config.remote.page_size).ok_or(ConfigError::ZeroPageSize)?;

    let collector = LocalPostCollector::new(
        ctx.changes,
        ctx.reporter,
        ctx.workdir,
        BlogFilter::new(&config.blog_root),
    );
    let collected = collector.collect_commit(&config.commit).await?;

    let mut report = RunReport {
        commit: config.commit.clone(),
        started_at,
        duration_ms: 0,
        dry_run: mode == RunMode::DryRun,
        outcomes: Vec::new(),
        deletions: collected.deletions,
        skipped: collected.skipped,
    };

    if collected.posts.is_empty() {
        ctx.reporter.info("No posts to publish.");
        report.duration_ms = clock.elapsed().as_millis();
        return Ok(report);
    }

    let lister = RemotePostLister::new(ctx.transport, page_size);
    let publication_id = lister.fetch_publication_id(&config.remote.host).await?;
    let remote = lister.list_all_posts(&config.remote.host).await?;
    tracing::info!(
        local = collected.posts.len(),
        remote = remote.len(),
        "reconciling"
    );

    for title in duplicate_remote_titles(&remote) {
        ctx.reporter.warn(&format!(
            "Several remote posts are titled \"{title}\"; the first one listed will be updated."
        ));
    }

    let intents = reconcile(&collected.posts, &remote, &publication_id);
    let mutator = RemoteMutator::new(ctx.transport);
    for intent in &intents {
        let outcome = match mode {
            RunMode::Apply => apply_one(&mutator, intent, ctx.reporter).await,
            RunMode::DryRun => plan_one(intent, ctx.reporter),
        };
        report.outcomes.push(outcome);
    }

    report.duration_ms = clock.elapsed().as_millis();
    Ok(report)
}

async fn apply_one(
    mutator: &RemoteMutator<'_>,
    intent: &Intent,
    reporter: &dyn Reporter,
) -> IntentOutcome {
    let post = intent.post();
    let (action, verb, progress, done) = match intent {
        Intent::Create { .. } => (Action::Created, "create", "Creating", "Published"),
        Intent::Update { .. } => (Action::Updated, "update", "Updating", "Updated"),
    };
    reporter.info(&format!(
        "{progress} post on the platform: {}",
        post.source_path.display()
    ));

    let (url, error) = match mutator.apply(intent).await {
        Ok(url) => {
            reporter.info(&format!(
                "{done} {} ({url}); it can take a few minutes to show up.",
                post.source_path.display()
            ));
            (Some(url), None)
        }
        Err(err) => {
            reporter.error(&format!("Failed to {verb} post \"{}\": {err}", post.title));
            (None, Some(err.to_string()))
        }
    };

    IntentOutcome {
        title: post.title.clone(),
        source_path: post.source_path.clone(),
        action,
        url,
        error,
    }
}

fn plan_one(intent: &Intent, reporter: &dyn Reporter) -> IntentOutcome {
    let post = intent.post();
    let action = match intent {
        Intent::Create { .. } => {
            reporter.info(&format!(
                "[dry-run] would create \"{}\" from {}",
                post.title,
                post.source_path.display()
            ));
            Action::WouldCreate
        }
        Intent::Update { remote_id, .. } => {
            reporter.info(&format!(
                "[dry-run] would update \"{}\" (remote id {remote_id}) from {}",
                post.title,
                post.source_path.display()
            ));
            Action::WouldUpdate
        }
    };
    IntentOutcome {
        title: post.title.clone(),
        source_path: post.source_path.clone(),
        action,
        url: None,
        error: None,
    }
}
