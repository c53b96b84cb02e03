//! `postsync remote`: list the publication's stored posts.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use postsync_core::{ConfigError, RemoteConfig, RemotePost};
use postsync_remote::{HttpTransport, PageSize, RemotePostLister};

use super::{runtime, ConnectionArgs};

/// Arguments for `postsync remote`.
#[derive(Args, Debug)]
pub struct RemoteArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct RemoteTableRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "title")]
    title: String,
}

impl RemoteArgs {
    pub fn run(self) -> Result<()> {
        let file = self.connection.file_config(Path::new("."))?;
        let remote = RemoteConfig::resolve(
            self.connection.host.clone(),
            self.connection.token.clone(),
            &file,
        )?;
        let page_size = PageSize::new(remote.page_size).ok_or(ConfigError::ZeroPageSize)?;
        let transport = HttpTransport::new(&remote).context("failed to build HTTP client")?;
        let lister = RemotePostLister::new(&transport, page_size);

        let posts = runtime()?
            .block_on(lister.list_all_posts(&remote.host))
            .with_context(|| format!("failed to list posts for {}", remote.host))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&posts).context("failed to serialize posts")?
            );
            return Ok(());
        }

        print_table(&remote.host, posts);
        Ok(())
    }
}

fn print_table(host: &str, posts: Vec<RemotePost>) {
    println!("{host} | {} posts", posts.len());
    if posts.is_empty() {
        return;
    }
    let rows: Vec<RemoteTableRow> = posts
        .into_iter()
        .map(|post| RemoteTableRow {
            id: post.id.0,
            title: post.title,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
