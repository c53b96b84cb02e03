//! postsync: publish a commit's blog posts to a hosted blogging platform.
//!
//! # Usage
//!
//! ```text
//! postsync sync [--host <host>] [--token <pat>] [--commit <sha>] [--repo <dir>]
//!               [--config <file>] [--dry-run] [--json]
//! postsync remote [--host <host>] [--token <pat>] [--config <file>] [--json]
//! postsync slug <name>...
//! ```
//!
//! `--host`, `--token` and `--commit` fall back to `HASHNODE_HOST`,
//! `HASHNODE_PAT` and `GITHUB_SHA`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{remote::RemoteArgs, slug::SlugArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "postsync",
    version,
    about = "Publish and update blog posts from a git commit",
    long_about = None,
)]
struct Cli {
    /// Log request and paging detail to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update the posts touched by a commit.
    Sync(SyncArgs),

    /// List every post currently stored on the platform.
    Remote(RemoteArgs),

    /// Print the slug derived from each name.
    Slug(SlugArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Remote(args) => args.run(),
        Commands::Slug(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
