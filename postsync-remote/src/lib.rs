//! # postsync-remote
//!
//! Everything that talks to the blog platform's GraphQL API.
//!
//! Use [`RemotePostLister`] to read the complete remote catalog and the
//! publication id, and [`RemoteMutator`] to apply create/update intents.
//! Both go through the [`GraphqlTransport`] seam; [`HttpTransport`] is the
//! production implementation.

pub mod error;
pub mod lister;
pub mod mutator;
pub mod queries;
pub mod transport;

pub use error::{FetchError, MutationError, TransportError};
pub use lister::{Page, PageSize, RemotePostLister};
pub use mutator::{
    create_input, request_for, update_input, PublishPostInput, RemoteMutator, UpdatePostInput,
};
pub use transport::{GraphqlError, GraphqlRequest, GraphqlResponse, GraphqlTransport, HttpTransport};
