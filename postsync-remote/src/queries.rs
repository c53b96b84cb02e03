//! GraphQL documents sent to the platform.
//!
//! All inputs travel as variables; nothing is interpolated into the text.

/// One page of the publication's posts plus the publication id.
pub const POSTS_PAGE: &str = r#"query PostsPage($host: String!, $first: Int!, $after: String) {
  publication(host: $host) {
    id
    posts(first: $first, after: $after) {
      edges {
        cursor
        node {
          id
          title
        }
      }
    }
  }
}"#;

pub const PUBLICATION_ID: &str = r#"query PublicationId($host: String!) {
  publication(host: $host) {
    id
  }
}"#;

pub const PUBLISH_POST: &str = r#"mutation PublishPost($input: PublishPostInput!) {
  publishPost(input: $input) {
    post {
      id
      title
      content {
        markdown
      }
      tags {
        name
        slug
      }
      url
    }
  }
}"#;

pub const UPDATE_POST: &str = r#"mutation UpdatePost($input: UpdatePostInput!) {
  updatePost(input: $input) {
    post {
      id
      title
      content {
        markdown
      }
      tags {
        name
        slug
      }
      url
    }
  }
}"#;
