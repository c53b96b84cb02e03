//! Domain types for a postsync run.
//!
//! All path fields use `PathBuf`. Every value here is built once and never
//! mutated; stages hand them to each other by reference or by clone.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::slug::slugify;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identifier of the target publication (blog) on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicationId(pub String);

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PublicationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PublicationId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Platform-assigned identifier of a stored post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemotePostId(pub String);

impl fmt::Display for RemotePostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RemotePostId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RemotePostId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Canonical public URL of a post, as echoed back by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostUrl(pub String);

impl fmt::Display for PostUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PostUrl {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// A tag as sent to the platform: display name plus derived slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Builds a tag whose slug is derived from `name`.
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            slug: slugify(name),
        }
    }
}

/// A markdown post found in the change set, with a validated title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalPost {
    /// Non-empty title from the front matter; the matching key.
    pub title: String,
    /// Tag names in front matter order.
    pub tags: Vec<String>,
    /// Markdown body with the front matter stripped.
    pub body: String,
    /// Repository-relative path of the source file.
    pub source_path: PathBuf,
}

impl LocalPost {
    /// The tag list in platform shape, slugs always recomputed.
    pub fn tag_inputs(&self) -> Vec<Tag> {
        self.tags.iter().map(|name| Tag::from_name(name)).collect()
    }
}

/// A touched post file that no longer exists in the working tree.
///
/// Informational only: remote posts are never deleted automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionNotice {
    pub source_path: PathBuf,
    /// Title read from the parent revision, when it could be recovered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovered_title: Option<String>,
}

/// A post already stored on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePost {
    pub id: RemotePostId,
    pub title: String,
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// A decided but not yet applied remote write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Intent {
    /// Publish a new post into the publication.
    Create {
        post: LocalPost,
        publication_id: PublicationId,
    },
    /// Overwrite an existing remote post with the local representation.
    Update {
        remote_id: RemotePostId,
        post: LocalPost,
    },
}

impl Intent {
    /// The local post this intent carries.
    pub fn post(&self) -> &LocalPost {
        match self {
            Intent::Create { post, .. } | Intent::Update { post, .. } => post,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, Intent::Create { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
