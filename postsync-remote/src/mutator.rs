//! Applying create/update intents to the platform.
//!
//! Request shaping ([`create_input`], [`update_input`]) is kept apart from
//! the transport call so the payload contract can be checked without I/O.
//! Every request carries the full local representation: title, markdown
//! body and the complete derived tag list.

use serde::Serialize;
use serde_json::{json, Value};

use postsync_core::{Intent, LocalPost, PostUrl, PublicationId, RemotePostId, Tag};

use crate::error::MutationError;
use crate::queries;
use crate::transport::{GraphqlRequest, GraphqlTransport};

/// `PublishPostInput` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPostInput {
    pub title: String,
    pub content_markdown: String,
    pub tags: Vec<Tag>,
    pub publication_id: PublicationId,
}

/// `UpdatePostInput` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    pub id: RemotePostId,
    pub title: String,
    pub content_markdown: String,
    pub tags: Vec<Tag>,
}

pub fn create_input(post: &LocalPost, publication_id: &PublicationId) -> PublishPostInput {
    PublishPostInput {
        title: post.title.clone(),
        content_markdown: post.body.clone(),
        tags: post.tag_inputs(),
        publication_id: publication_id.clone(),
    }
}

pub fn update_input(remote_id: &RemotePostId, post: &LocalPost) -> UpdatePostInput {
    UpdatePostInput {
        id: remote_id.clone(),
        title: post.title.clone(),
        content_markdown: post.body.clone(),
        tags: post.tag_inputs(),
    }
}

/// Builds the GraphQL request for an intent.
pub fn request_for(intent: &Intent) -> GraphqlRequest {
    match intent {
        Intent::Create {
            post,
            publication_id,
        } => GraphqlRequest::new(
            queries::PUBLISH_POST,
            json!({ "input": create_input(post, publication_id) }),
        ),
        Intent::Update { remote_id, post } => GraphqlRequest::new(
            queries::UPDATE_POST,
            json!({ "input": update_input(remote_id, post) }),
        ),
    }
}

/// Sends intents to the platform one at a time.
pub struct RemoteMutator<'a> {
    transport: &'a dyn GraphqlTransport,
}

impl<'a> RemoteMutator<'a> {
    pub fn new(transport: &'a dyn GraphqlTransport) -> Self {
        Self { transport }
    }

    /// Applies one intent and returns the post's canonical URL.
    pub async fn apply(&self, intent: &Intent) -> Result<PostUrl, MutationError> {
        let request = request_for(intent);
        let response = self.transport.execute(&request).await?;
        if let Some(messages) = response.error_messages() {
            return Err(MutationError::Graphql { messages });
        }

        let pointer = match intent {
            Intent::Create { .. } => "/publishPost/post/url",
            Intent::Update { .. } => "/updatePost/post/url",
        };
        response
            .data
            .as_ref()
            .and_then(|data| data.pointer(pointer))
            .and_then(Value::as_str)
            .map(PostUrl::from)
            .ok_or(MutationError::MissingUrl)
    }
}
