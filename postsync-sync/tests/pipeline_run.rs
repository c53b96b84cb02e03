//! End-to-end runs of the sync pipeline against an in-memory platform.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;

use postsync_core::{RecordingReporter, RemoteConfig, RunConfig};
use postsync_remote::{
    queries, GraphqlRequest, GraphqlResponse, GraphqlTransport, TransportError,
};
use postsync_sync::pipeline::run;
use postsync_sync::{
    Action, ChangeSetError, ChangeSetReader, RunContext, RunMode, SyncError,
};

const HOST: &str = "blog.example.dev";
const COMMIT: &str = "deadbeef";

/// Remote catalog plus recorded mutations. Page cursors are `cur-<index>`.
struct Platform {
    catalog: Vec<(String, String)>,
    fail_listing_page: Option<usize>,
    reject_titles: Vec<String>,
    requests: Mutex<Vec<GraphqlRequest>>,
}

impl Platform {
    fn with_catalog(posts: &[(&str, &str)]) -> Self {
        Self {
            catalog: posts
                .iter()
                .map(|(id, title)| (id.to_string(), title.to_string()))
                .collect(),
            fail_listing_page: None,
            reject_titles: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing_listing_page(mut self, page: usize) -> Self {
        self.fail_listing_page = Some(page);
        self
    }

    fn rejecting(mut self, title: &str) -> Self {
        self.reject_titles.push(title.to_owned());
        self
    }

    fn requests_for(&self, query: &str) -> Vec<GraphqlRequest> {
        self.requests
            .lock()
            .expect("lock")
            .iter()
            .filter(|r| r.query == query)
            .cloned()
            .collect()
    }

    fn mutations(&self) -> Vec<GraphqlRequest> {
        let mut all = self.requests_for(queries::PUBLISH_POST);
        all.extend(self.requests_for(queries::UPDATE_POST));
        all
    }

    fn total_requests(&self) -> usize {
        self.requests.lock().expect("lock").len()
    }

    fn page(&self, variables: &Value) -> Result<GraphqlResponse, TransportError> {
        let page_number = self.requests_for(queries::POSTS_PAGE).len();
        if self.fail_listing_page == Some(page_number) {
            return Err(TransportError::Status {
                status: 500,
                body: "internal error".into(),
            });
        }
        let first = variables["first"].as_u64().expect("first") as usize;
        let start = variables["after"]
            .as_str()
            .map(|c| c.trim_start_matches("cur-").parse::<usize>().expect("cursor") + 1)
            .unwrap_or(0);
        let edges: Vec<Value> = self
            .catalog
            .iter()
            .enumerate()
            .skip(start)
            .take(first)
            .map(|(i, (id, title))| {
                json!({ "cursor": format!("cur-{i}"), "node": { "id": id, "title": title } })
            })
            .collect();
        Ok(GraphqlResponse::with_data(json!({
            "publication": { "id": "pub-1", "posts": { "edges": edges } }
        })))
    }

    fn mutate(&self, field: &str, input: &Value) -> GraphqlResponse {
        let title = input["title"].as_str().expect("title");
        if self.reject_titles.iter().any(|t| t == title) {
            return GraphqlResponse::with_errors(["Validation failed"]);
        }
        let slug = postsync_core::slugify(title);
        GraphqlResponse::with_data(json!({
            field: { "post": { "url": format!("https://{HOST}/{slug}") } }
        }))
    }
}

#[async_trait]
impl GraphqlTransport for Platform {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, TransportError> {
        self.requests.lock().expect("lock").push(request.clone());
        match request.query {
            q if q == queries::PUBLICATION_ID => Ok(GraphqlResponse::with_data(json!({
                "publication": { "id": "pub-1" }
            }))),
            q if q == queries::POSTS_PAGE => self.page(&request.variables),
            q if q == queries::PUBLISH_POST => {
                Ok(self.mutate("publishPost", &request.variables["input"]))
            }
            q if q == queries::UPDATE_POST => {
                Ok(self.mutate("updatePost", &request.variables["input"]))
            }
            other => panic!("unexpected query: {other}"),
        }
    }
}

struct Changes {
    touched: Vec<PathBuf>,
    parent: HashMap<PathBuf, String>,
}

impl Changes {
    fn touching(paths: &[&str]) -> Self {
        Self {
            touched: paths.iter().map(PathBuf::from).collect(),
            parent: HashMap::new(),
        }
    }
}

#[async_trait]
impl ChangeSetReader for Changes {
    async fn touched_paths(&self, _commit: &str) -> Result<Vec<PathBuf>, ChangeSetError> {
        Ok(self.touched.clone())
    }

    async fn content_at_parent(&self, _commit: &str, path: &Path) -> Option<String> {
        self.parent.get(path).cloned()
    }
}

fn config(page_size: u32) -> RunConfig {
    RunConfig {
        remote: RemoteConfig {
            host: HOST.into(),
            token: "pat".into(),
            endpoint: "http://unused.invalid".into(),
            page_size,
        },
        commit: COMMIT.into(),
        blog_root: PathBuf::from("blog"),
    }
}

fn workdir_with(posts: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("workdir");
    for (rel, content) in posts {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }
    dir
}

#[tokio::test]
async fn updates_matching_title_and_creates_the_rest() {
    let workdir = workdir_with(&[
        ("blog/a.md", "---\ntitle: A\ntags: [X Y]\n---\nA body\n"),
        ("blog/b.md", "---\ntitle: B\n---\nB body\n"),
    ]);
    let platform = Platform::with_catalog(&[("r1", "A")]);
    let changes = Changes::touching(&["blog/a.md", "blog/b.md"]);
    let reporter = RecordingReporter::new();
    let config = config(20);
    let ctx = RunContext {
        config: &config,
        workdir: workdir.path(),
        transport: &platform,
        changes: &changes,
        reporter: &reporter,
    };

    let report = run(&ctx, RunMode::Apply).await.expect("run");

    assert_eq!(report.commit, COMMIT);
    assert!(!report.dry_run);
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcomes[0].action, Action::Updated);
    assert_eq!(report.outcomes[1].action, Action::Created);
    assert_eq!(report.failures(), 0);
    assert_eq!(
        report.outcomes[1].url.as_ref().map(|u| u.0.as_str()),
        Some("https://blog.example.dev/b")
    );

    let updates = platform.requests_for(queries::UPDATE_POST);
    assert_eq!(updates.len(), 1);
    let input = &updates[0].variables["input"];
    assert_eq!(input["id"], "r1");
    assert_eq!(input["title"], "A");
    assert_eq!(input["contentMarkdown"], "A body\n");
    assert_eq!(input["tags"], json!([{ "name": "X Y", "slug": "x-y" }]));

    let creates = platform.requests_for(queries::PUBLISH_POST);
    assert_eq!(creates.len(), 1);
    let input = &creates[0].variables["input"];
    assert_eq!(input["title"], "B");
    assert_eq!(input["publicationId"], "pub-1");
    assert_eq!(input["tags"], json!([]));

    assert!(reporter.contains("Markdown posts found in commit: 2"));
    assert!(reporter.errors().is_empty());
}

#[tokio::test]
async fn multi_page_catalog_is_listed_before_reconciling() {
    let workdir = workdir_with(&[("blog/late.md", "---\ntitle: Late\n---\n")]);
    let platform = Platform::with_catalog(&[
        ("r0", "Zero"),
        ("r1", "One"),
        ("r2", "Two"),
        ("r3", "Three"),
        ("r4", "Late"),
    ]);
    let changes = Changes::touching(&["blog/late.md"]);
    let reporter = RecordingReporter::new();
    let config = config(2);
    let ctx = RunContext {
        config: &config,
        workdir: workdir.path(),
        transport: &platform,
        changes: &changes,
        reporter: &reporter,
    };

    let report = run(&ctx, RunMode::Apply).await.expect("run");

    assert_eq!(platform.requests_for(queries::POSTS_PAGE).len(), 3);
    assert_eq!(report.outcomes[0].action, Action::Updated);
    let updates = platform.requests_for(queries::UPDATE_POST);
    assert_eq!(updates[0].variables["input"]["id"], "r4");
    assert!(platform.requests_for(queries::PUBLISH_POST).is_empty());
}

#[tokio::test]
async fn listing_failure_aborts_before_any_mutation() {
    let workdir = workdir_with(&[
        ("blog/a.md", "---\ntitle: A\n---\n"),
        ("blog/b.md", "---\ntitle: B\n---\n"),
    ]);
    let platform = Platform::with_catalog(&[("r0", "Zero"), ("r1", "One"), ("r2", "A")])
        .failing_listing_page(2);
    let changes = Changes::touching(&["blog/a.md", "blog/b.md"]);
    let reporter = RecordingReporter::new();
    let config = config(2);
    let ctx = RunContext {
        config: &config,
        workdir: workdir.path(),
        transport: &platform,
        changes: &changes,
        reporter: &reporter,
    };

    let err = run(&ctx, RunMode::Apply).await.expect_err("must abort");

    assert!(matches!(err, SyncError::Fetch(_)), "{err:?}");
    assert!(platform.mutations().is_empty());
}

#[tokio::test]
async fn failed_mutation_does_not_stop_later_posts() {
    let workdir = workdir_with(&[
        ("blog/bad.md", "---\ntitle: Bad\n---\n"),
        ("blog/good.md", "---\ntitle: Good\n---\n"),
    ]);
    let platform = Platform::with_catalog(&[]).rejecting("Bad");
    let changes = Changes::touching(&["blog/bad.md", "blog/good.md"]);
    let reporter = RecordingReporter::new();
    let config = config(20);
    let ctx = RunContext {
        config: &config,
        workdir: workdir.path(),
        transport: &platform,
        changes: &changes,
        reporter: &reporter,
    };

    let report = run(&ctx, RunMode::Apply).await.expect("run");

    assert_eq!(platform.mutations().len(), 2);
    assert_eq!(report.failures(), 1);
    assert!(report.outcomes[0].is_failure());
    assert_eq!(report.count(Action::Created), 1);
    let errors = reporter.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Failed to create post \"Bad\""));
    assert!(errors[0].contains("Validation failed"));
}

#[tokio::test]
async fn dry_run_lists_but_never_mutates() {
    let workdir = workdir_with(&[
        ("blog/a.md", "---\ntitle: A\n---\n"),
        ("blog/b.md", "---\ntitle: B\n---\n"),
    ]);
    let platform = Platform::with_catalog(&[("r1", "A")]);
    let changes = Changes::touching(&["blog/a.md", "blog/b.md"]);
    let reporter = RecordingReporter::new();
    let config = config(20);
    let ctx = RunContext {
        config: &config,
        workdir: workdir.path(),
        transport: &platform,
        changes: &changes,
        reporter: &reporter,
    };

    let report = run(&ctx, RunMode::DryRun).await.expect("run");

    assert!(report.dry_run);
    let actions: Vec<_> = report.outcomes.iter().map(|o| o.action).collect();
    assert_eq!(actions, vec![Action::WouldUpdate, Action::WouldCreate]);
    assert!(platform.mutations().is_empty());
    assert!(reporter.contains("[dry-run] would update \"A\" (remote id r1)"));
}

#[tokio::test]
async fn deletions_only_make_no_remote_calls() {
    let workdir = workdir_with(&[("README.md", "hello\n")]);
    let mut changes = Changes::touching(&["blog/old.md", "README.md"]);
    changes.parent.insert(
        PathBuf::from("blog/old.md"),
        "---\ntitle: Old Post\n---\n".into(),
    );
    let platform = Platform::with_catalog(&[("r1", "Old Post")]);
    let reporter = RecordingReporter::new();
    let config = config(20);
    let ctx = RunContext {
        config: &config,
        workdir: workdir.path(),
        transport: &platform,
        changes: &changes,
        reporter: &reporter,
    };

    let report = run(&ctx, RunMode::Apply).await.expect("run");

    assert!(report.outcomes.is_empty());
    assert_eq!(report.deletions.len(), 1);
    assert_eq!(report.deletions[0].recovered_title.as_deref(), Some("Old Post"));
    assert_eq!(platform.total_requests(), 0);
    assert!(reporter.contains("No posts to publish."));
}

#[tokio::test]
async fn zero_page_size_is_rejected() {
    let workdir = workdir_with(&[]);
    let platform = Platform::with_catalog(&[]);
    let changes = Changes::touching(&[]);
    let reporter = RecordingReporter::new();
    let config = config(0);
    let ctx = RunContext {
        config: &config,
        workdir: workdir.path(),
        transport: &platform,
        changes: &changes,
        reporter: &reporter,
    };

    let err = run(&ctx, RunMode::Apply).await.expect_err("zero page size");

    assert!(matches!(err, SyncError::Config(_)));
    assert_eq!(platform.total_requests(), 0);
}

#[tokio::test]
async fn duplicate_remote_titles_are_warned_about() {
    let workdir = workdir_with(&[("blog/dup.md", "---\ntitle: Dup\n---\n")]);
    let platform = Platform::with_catalog(&[("r1", "Dup"), ("r2", "Dup")]);
    let changes = Changes::touching(&["blog/dup.md"]);
    let reporter = RecordingReporter::new();
    let config = config(20);
    let ctx = RunContext {
        config: &config,
        workdir: workdir.path(),
        transport: &platform,
        changes: &changes,
        reporter: &reporter,
    };

    run(&ctx, RunMode::Apply).await.expect("run");

    assert!(reporter.contains("Several remote posts are titled \"Dup\""));
    let updates = platform.requests_for(queries::UPDATE_POST);
    assert_eq!(updates[0].variables["input"]["id"], "r1");
}
