//! Exhaustive, cursor-chained listing of the remote post catalog.
//!
//! ## Paging protocol
//!
//! 1. Request the first page with no cursor.
//! 2. A page holding fewer than `page_size` posts is the last one. This
//!    includes the empty page returned when the catalog size is an exact
//!    multiple of the page size.
//! 3. Otherwise request the next page `after` the cursor of the previous
//!    page's last item.
//!
//! Pages are fetched strictly one after another. Any failure discards
//! everything accumulated so far: a truncated catalog would turn updates
//! into duplicate creates.

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::Deserialize;
use serde_json::{json, Value};

use postsync_core::config::DEFAULT_PAGE_SIZE;
use postsync_core::{PublicationId, RemotePost, RemotePostId};

use crate::error::FetchError;
use crate::queries;
use crate::transport::{GraphqlRequest, GraphqlResponse, GraphqlTransport};

// ---------------------------------------------------------------------------
// Page model
// ---------------------------------------------------------------------------

/// Number of posts requested per listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// `None` for zero.
    pub fn new(size: u32) -> Option<Self> {
        NonZeroU32::new(size).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        const DEFAULT: NonZeroU32 = match NonZeroU32::new(DEFAULT_PAGE_SIZE) {
            Some(size) => size,
            None => panic!("default page size must be non-zero"),
        };
        Self(DEFAULT)
    }
}

/// One decoded listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub posts: Vec<RemotePost>,
    /// Cursor of the last item; `None` only for an empty page.
    pub end_cursor: Option<String>,
}

impl Page {
    /// A short page ends the listing.
    pub fn is_last(&self, page_size: PageSize) -> bool {
        self.posts.len() < page_size.get() as usize
    }
}

#[derive(Debug, Deserialize)]
struct PostsPageData {
    publication: Option<PublicationPosts>,
}

#[derive(Debug, Deserialize)]
struct PublicationPosts {
    posts: PostConnection,
}

#[derive(Debug, Deserialize)]
struct PostConnection {
    edges: Vec<PostEdge>,
}

#[derive(Debug, Deserialize)]
struct PostEdge {
    #[serde(default)]
    cursor: Option<String>,
    node: PostNode,
}

#[derive(Debug, Deserialize)]
struct PostNode {
    id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct PublicationIdData {
    publication: Option<PublicationIdNode>,
}

#[derive(Debug, Deserialize)]
struct PublicationIdNode {
    id: Option<String>,
}

// ---------------------------------------------------------------------------
// Lister
// ---------------------------------------------------------------------------

/// Reads the publication id and the full post catalog for a host.
pub struct RemotePostLister<'a> {
    transport: &'a dyn GraphqlTransport,
    page_size: PageSize,
}

impl<'a> RemotePostLister<'a> {
    pub fn new(transport: &'a dyn GraphqlTransport, page_size: PageSize) -> Self {
        Self {
            transport,
            page_size,
        }
    }

    /// Fetches the id of the publication served at `host`.
    pub async fn fetch_publication_id(&self, host: &str) -> Result<PublicationId, FetchError> {
        let request = GraphqlRequest::new(queries::PUBLICATION_ID, json!({ "host": host }));
        let data = data_of(self.transport.execute(&request).await?, host)?;
        let decoded: PublicationIdData = serde_json::from_value(data)?;
        decoded
            .publication
            .and_then(|p| p.id)
            .filter(|id| !id.is_empty())
            .map(PublicationId::from)
            .ok_or_else(|| FetchError::MissingPublication {
                host: host.to_owned(),
            })
    }

    /// Fetches a single page starting after `after`.
    pub async fn fetch_page(&self, host: &str, after: Option<&str>) -> Result<Page, FetchError> {
        let request = GraphqlRequest::new(
            queries::POSTS_PAGE,
            json!({
                "host": host,
                "first": self.page_size.get(),
                "after": after,
            }),
        );
        let data = data_of(self.transport.execute(&request).await?, host)?;
        let decoded: PostsPageData = serde_json::from_value(data)?;
        let publication = decoded
            .publication
            .ok_or_else(|| FetchError::MissingPublication {
                host: host.to_owned(),
            })?;

        let edges = publication.posts.edges;
        let end_cursor = edges
            .last()
            .map(|edge| edge.cursor.clone().unwrap_or_else(|| edge.node.id.clone()));
        let posts = edges
            .into_iter()
            .map(|edge| RemotePost {
                id: RemotePostId::from(edge.node.id),
                title: edge.node.title,
            })
            .collect();

        Ok(Page { posts, end_cursor })
    }

    /// Pages through the whole catalog and returns every post exactly once.
    pub async fn list_all_posts(&self, host: &str) -> Result<Vec<RemotePost>, FetchError> {
        let mut catalog: Vec<RemotePost> = Vec::new();
        let mut seen: HashSet<RemotePostId> = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut requests = 0usize;

        loop {
            let page = self.fetch_page(host, cursor.as_deref()).await?;
            requests += 1;
            let is_last = page.is_last(self.page_size);
            let received = page.posts.len();

            let before = catalog.len();
            catalog.extend(
                page.posts
                    .into_iter()
                    .filter(|post| seen.insert(post.id.clone())),
            );
            tracing::debug!(
                page = requests,
                received,
                new = catalog.len() - before,
                "fetched remote page"
            );

            if is_last {
                break;
            }
            if catalog.len() == before {
                return Err(FetchError::CursorStalled {
                    after: cursor.unwrap_or_default(),
                });
            }
            // A full page is never empty, so it always yields a cursor.
            cursor = page.end_cursor;
        }

        tracing::info!(posts = catalog.len(), requests, "remote catalog loaded");
        Ok(catalog)
    }
}

/// Unwraps `data`, turning error arrays and empty payloads into failures.
fn data_of(response: GraphqlResponse, host: &str) -> Result<Value, FetchError> {
    if let Some(messages) = response.error_messages() {
        return Err(FetchError::Graphql { messages });
    }
    match response.data {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(FetchError::MissingPublication {
            host: host.to_owned(),
        }),
    }
}
