//! Workspace lookup by subdomain.
//!
//! # Responsibilities
//! - Issue exactly one lookup request per call
//! - Map 404 to `NotFound`, everything else that is not a 200 to `LoadFailed`
//! - Validate the response body into a typed `Workspace`
//!
//! # Design Decisions
//! - No retry and no caching: each controller run asks again
//! - Timeout is left to the HTTP client configuration

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::observability::metrics;
use crate::workspace::types::{CompanyEnvelope, Workspace};

/// Lookup failure kinds. Display strings are shown to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Workspace not found")]
    NotFound,

    #[error("Failed to load workspace")]
    LoadFailed,
}

/// Flattened `{ workspace, error }` view of a lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveOutcome {
    pub workspace: Option<Workspace>,
    pub error: Option<String>,
}

impl From<Result<Workspace, ResolveError>> for ResolveOutcome {
    fn from(result: Result<Workspace, ResolveError>) -> Self {
        match result {
            Ok(workspace) => Self {
                workspace: Some(workspace),
                error: None,
            },
            Err(e) => Self {
                workspace: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Translates a validated identifier into workspace metadata.
#[async_trait]
pub trait WorkspaceResolver: Send + Sync + std::fmt::Debug {
    async fn resolve(&self, identifier: &str) -> Result<Workspace, ResolveError>;
}

/// Resolver backed by the REST lookup endpoint.
#[derive(Debug, Clone)]
pub struct HttpWorkspaceResolver {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpWorkspaceResolver {
    /// Create a resolver for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a resolver sharing an existing HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    /// Attach `Authorization: Bearer <token>` to lookups.
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    fn lookup_url(&self, identifier: &str) -> String {
        format!("{}/companies/subdomain/{}", self.base_url, identifier)
    }
}

/// Label recorded for an answered lookup. A 200 whose body does not parse
/// is counted as `malformed_body`, matching the `LoadFailed` it becomes.
fn status_label(status: StatusCode, body_parsed: bool) -> String {
    if status == StatusCode::OK && !body_parsed {
        "malformed_body".to_string()
    } else {
        status.as_str().to_string()
    }
}

#[async_trait]
impl WorkspaceResolver for HttpWorkspaceResolver {
    async fn resolve(&self, identifier: &str) -> Result<Workspace, ResolveError> {
        let start = Instant::now();
        let mut request = self.client.get(self.lookup_url(identifier));
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(subdomain = %identifier, error = %e, "Workspace lookup failed");
                metrics::record_resolver_request("network_error", start);
                return Err(ResolveError::LoadFailed);
            }
        };

        let status = response.status();
        match status {
            StatusCode::OK => {
                let parsed = response.json::<CompanyEnvelope>().await;
                metrics::record_resolver_request(&status_label(status, parsed.is_ok()), start);
                match parsed {
                    Ok(envelope) => {
                        tracing::debug!(
                            subdomain = %identifier,
                            workspace_id = %envelope.company.id,
                            "Workspace resolved"
                        );
                        Ok(envelope.company)
                    }
                    Err(e) => {
                        tracing::warn!(subdomain = %identifier, error = %e, "Malformed workspace body");
                        Err(ResolveError::LoadFailed)
                    }
                }
            }
            StatusCode::NOT_FOUND => {
                tracing::debug!(subdomain = %identifier, "Workspace not found");
                metrics::record_resolver_request(&status_label(status, true), start);
                Err(ResolveError::NotFound)
            }
            other => {
                tracing::warn!(subdomain = %identifier, status = %other, "Workspace lookup returned error status");
                metrics::record_resolver_request(&status_label(other, true), start);
                Err(ResolveError::LoadFailed)
            }
        }
    }
}
