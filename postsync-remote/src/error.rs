//! Error types for postsync-remote.

use thiserror::Error;

/// A request never produced a GraphQL response document.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS, timeout or body read failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status without a GraphQL error payload.
    #[error("platform returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not a GraphQL response document.
    #[error("undecodable response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reading the remote catalog failed. Fatal for the whole run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response carried a GraphQL `errors` array.
    #[error("GraphQL errors: {}", .messages.join("; "))]
    Graphql { messages: Vec<String> },

    /// `data.publication` was absent or null.
    #[error("no publication found for host {host}")]
    MissingPublication { host: String },

    /// `data` did not have the shape the query asked for.
    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),

    /// A full page repeated ids already seen; paging would never end.
    #[error("pagination stalled: page after cursor {after} returned only known posts")]
    CursorStalled { after: String },
}

/// Applying one intent failed. Isolated to that intent.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("GraphQL errors: {}", .messages.join("; "))]
    Graphql { messages: Vec<String> },

    /// The mutation succeeded but no post URL came back.
    #[error("response did not include the post url")]
    MissingUrl,
}
