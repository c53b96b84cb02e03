//! `postsync slug`: show the slug a tag name maps to.

use anyhow::Result;
use clap::Args;

use postsync_core::slugify;

/// Arguments for `postsync slug`.
#[derive(Args, Debug)]
pub struct SlugArgs {
    /// Names to slugify, one output line each.
    #[arg(required = true)]
    pub names: Vec<String>,
}

impl SlugArgs {
    pub fn run(self) -> Result<()> {
        for name in &self.names {
            println!("{}", slugify(name));
        }
        Ok(())
    }
}
