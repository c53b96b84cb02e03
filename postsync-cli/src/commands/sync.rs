//! `postsync sync`: publish the posts touched by one commit.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use postsync_core::config::COMMIT_ENV;
use postsync_core::{Reporter, RunConfig, RunInputs, TracingReporter};
use postsync_remote::HttpTransport;
use postsync_sync::pipeline;
use postsync_sync::{Action, GitChangeSet, IntentOutcome, RunContext, RunMode, RunReport};

use super::console::ConsoleReporter;
use super::{runtime, ConnectionArgs};

/// Arguments for `postsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Commit whose touched posts are published.
    #[arg(long, env = COMMIT_ENV)]
    pub commit: Option<String>,

    /// Repository working tree.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,

    /// Reconcile and report without creating or updating anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON on stdout. Status lines go through the
    /// log filter instead.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let file = self.connection.file_config(&self.repo)?;
        let config = RunConfig::resolve(
            RunInputs {
                host: self.connection.host.clone(),
                token: self.connection.token.clone(),
                commit: self.commit.clone(),
            },
            &file,
        )?;
        tracing::debug!(?config, "resolved run configuration");

        let transport = HttpTransport::new(&config.remote).context("failed to build HTTP client")?;
        let changes = GitChangeSet::new(&self.repo);
        let reporter: Box<dyn Reporter> = if self.json {
            Box::new(TracingReporter)
        } else {
            Box::new(ConsoleReporter)
        };
        let mode = if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Apply
        };

        let ctx = RunContext {
            config: &config,
            workdir: &self.repo,
            transport: &transport,
            changes: &changes,
            reporter: reporter.as_ref(),
        };
        let report = runtime()?
            .block_on(pipeline::run(&ctx, mode))
            .with_context(|| format!("sync failed for commit {}", config.commit))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize run report")?
            );
        } else {
            print_summary(&report);
        }
        Ok(())
    }
}

fn print_summary(report: &RunReport) {
    if report.outcomes.is_empty() && report.deletions.is_empty() && report.skipped.is_empty() {
        return;
    }

    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    println!();
    for outcome in &report.outcomes {
        println!("  {} {}", marker(outcome), outcome_line(outcome));
    }
    for notice in &report.deletions {
        let title = notice.recovered_title.as_deref().unwrap_or("unknown title");
        println!(
            "  {} {} ({title}) deleted locally, left on the platform",
            "-".bright_black(),
            notice.source_path.display()
        );
    }
    for skipped in &report.skipped {
        println!(
            "  {} {} skipped: {}",
            "!".yellow(),
            skipped.source_path.display(),
            skipped.reason
        );
    }

    let (created, updated) = if report.dry_run {
        (
            report.count(Action::WouldCreate),
            report.count(Action::WouldUpdate),
        )
    } else {
        (report.count(Action::Created), report.count(Action::Updated))
    };
    let failed = report.failures();
    let failed_label = format!("{failed} failed");
    println!(
        "{prefix}{created} created, {updated} updated, {}, {} skipped ({} ms)",
        if failed > 0 {
            failed_label.red().bold().to_string()
        } else {
            failed_label
        },
        report.skipped.len(),
        report.duration_ms
    );
}

fn marker(outcome: &IntentOutcome) -> String {
    if outcome.is_failure() {
        return "✗".red().bold().to_string();
    }
    match outcome.action {
        Action::Created | Action::Updated => "✓".green().bold().to_string(),
        Action::WouldCreate | Action::WouldUpdate => "~".cyan().to_string(),
    }
}

fn outcome_line(outcome: &IntentOutcome) -> String {
    let verb = match (outcome.action, outcome.is_failure()) {
        (Action::Created, false) => "created",
        (Action::Created, true) => "failed to create",
        (Action::Updated, false) => "updated",
        (Action::Updated, true) => "failed to update",
        (Action::WouldCreate, _) => "would create",
        (Action::WouldUpdate, _) => "would update",
    };
    match (&outcome.url, &outcome.error) {
        (_, Some(err)) => format!("{verb} \"{}\": {err}", outcome.title),
        (Some(url), None) => format!("{verb} \"{}\" {url}", outcome.title),
        (None, None) => format!("{verb} \"{}\"", outcome.title),
    }
}
