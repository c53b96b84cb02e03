//! GraphQL transport seam and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use postsync_core::RemoteConfig;

use crate::error::TransportError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY_CHARS: usize = 200;

/// A query or mutation document with its variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    pub query: &'static str,
    pub variables: Value,
}

impl GraphqlRequest {
    pub fn new(query: &'static str, variables: Value) -> Self {
        Self { query, variables }
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

/// A decoded GraphQL response document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphqlError>>,
}

impl GraphqlResponse {
    /// A response with only a `data` member.
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    /// A response with only an `errors` member.
    pub fn with_errors<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data: None,
            errors: Some(
                messages
                    .into_iter()
                    .map(|m| GraphqlError { message: m.into() })
                    .collect(),
            ),
        }
    }

    /// Messages of the `errors` array, if it is present and non-empty.
    pub fn error_messages(&self) -> Option<Vec<String>> {
        match &self.errors {
            Some(errors) if !errors.is_empty() => {
                Some(errors.iter().map(|e| e.message.clone()).collect())
            }
            _ => None,
        }
    }
}

/// Sends one GraphQL request and returns the decoded response.
///
/// Implementations do not interpret `errors`; callers decide whether an
/// error array is fatal.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, TransportError>;
}

/// Posts GraphQL documents over HTTPS with the access token attached.
pub struct HttpTransport {
    http: Client,
    endpoint: String,
    token: String,
}

impl HttpTransport {
    pub fn new(config: &RemoteConfig) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, config))
    }

    /// Uses a preconfigured client (proxy, TLS or timeout settings).
    pub fn with_client(http: Client, config: &RemoteConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, TransportError> {
        tracing::debug!(endpoint = %self.endpoint, "sending GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, &self.token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // The platform reports auth and validation failures as non-2xx
            // responses that still carry a GraphQL error array.
            if let Ok(decoded) = serde_json::from_str::<GraphqlResponse>(&body) {
                if decoded.error_messages().is_some() {
                    return Ok(decoded);
                }
            }
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
