//! Create-vs-update decisions.
//!
//! Local posts are matched to remote posts by exact, case-sensitive title
//! equality. Titles that differ only in case or whitespace do not match.
//! When the remote catalog holds several posts with the same title, the
//! first one in catalog order wins; which one that is depends on the order
//! the platform lists posts in.
//!
//! Reconciliation is one-directional: remote posts without a local
//! counterpart, and deleted local files, never produce an intent.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use postsync_core::{Intent, LocalPost, PublicationId, RemotePost, RemotePostId};

/// Produces exactly one intent per local post, in input order.
pub fn reconcile(
    local: &[LocalPost],
    remote: &[RemotePost],
    publication_id: &PublicationId,
) -> Vec<Intent> {
    let mut by_title: HashMap<&str, &RemotePostId> = HashMap::with_capacity(remote.len());
    for post in remote {
        by_title.entry(post.title.as_str()).or_insert(&post.id);
    }

    local
        .iter()
        .map(|post| match by_title.get(post.title.as_str()) {
            Some(id) => Intent::Update {
                remote_id: (*id).clone(),
                post: post.clone(),
            },
            None => Intent::Create {
                post: post.clone(),
                publication_id: publication_id.clone(),
            },
        })
        .collect()
}

/// Titles that appear on more than one remote post, in first-seen order.
pub fn duplicate_remote_titles(remote: &[RemotePost]) -> Vec<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for post in remote {
        match counts.entry(post.title.as_str()) {
            Entry::Occupied(mut seen) => {
                *seen.get_mut() += 1;
                if *seen.get() == 2 {
                    duplicates.push(post.title.as_str());
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(1);
            }
        }
    }
    duplicates
}
