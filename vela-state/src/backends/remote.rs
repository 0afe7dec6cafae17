//! Terraform Cloud/Enterprise fetcher
//!
//! Resolves organization/workspace to a workspace id, asks for the current
//! state version, and downloads the hosted state document, all with bearer
//! token auth. No retry here: the workspace API is not covered by the
//! storage backoff rule, and a rejected token only gets more rejected.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::config::RemoteBackendConfig;
use crate::document::RawState;
use crate::error::{StateError, StateResult};
use crate::fetch::StateFetcher;
use crate::secret::Secret;

const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Fetcher for state held by a remote workspace
pub struct RemoteFetcher {
    client: reqwest::Client,
    base_url: String,
    organization: String,
    workspace: String,
    token: Secret,
    origin: String,
}

impl RemoteFetcher {
    pub fn new(config: &RemoteBackendConfig) -> StateResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StateError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url(&config.hostname),
            organization: config.organization.clone(),
            workspace: config.workspace.clone(),
            token: config.token.clone(),
            origin: config.origin(),
        })
    }

    /// Resolve organization/workspace to the workspace id
    async fn lookup_workspace_id(&self) -> StateResult<String> {
        let url = format!(
            "{}/api/v2/organizations/{}/workspaces/{}",
            self.base_url, self.organization, self.workspace
        );
        let what = format!("workspace {}/{}", self.organization, self.workspace);
        let body = self.get_json(&url, &what).await?;

        body.get("data")
            .and_then(|data| data.get("id"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                StateError::Network(format!("{}: malformed workspace response", self.origin))
            })
    }

    /// Fetch the download URL of the workspace's current state version
    async fn state_download_url(&self, workspace_id: &str) -> StateResult<String> {
        let url = format!(
            "{}/api/v2/workspaces/{}/current-state-version",
            self.base_url, workspace_id
        );
        let what = format!(
            "current state version of workspace {}/{}",
            self.organization, self.workspace
        );
        let body = self.get_json(&url, &what).await?;

        body.get("data")
            .and_then(|data| data.get("attributes"))
            .and_then(|attributes| attributes.get("hosted-state-download-url"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                StateError::Network(format!(
                    "{}: state version response carries no download URL",
                    self.origin
                ))
            })
    }

    /// Download the hosted state document
    async fn download(&self, url: &str) -> StateResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.expose())
            .send()
            .await
            .map_err(|e| StateError::Network(format!("{}: {}", self.origin, e)))?;

        let status = response.status();
        match status.as_u16() {
            401 | 403 => {
                return Err(StateError::Auth(format!(
                    "token rejected while downloading state for {}",
                    self.origin
                )));
            }
            404 => return Err(StateError::NotFound(format!("hosted state for {}", self.origin))),
            _ if !status.is_success() => {
                return Err(StateError::Network(format!(
                    "{}: unexpected status {} downloading state",
                    self.origin, status
                )));
            }
            _ => {}
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| StateError::Network(format!("{}: {}", self.origin, e)))
    }

    /// GET a JSON:API document, classifying auth and not-found responses
    async fn get_json(&self, url: &str, what: &str) -> StateResult<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.expose())
            .header(CONTENT_TYPE, JSON_API_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| StateError::Network(format!("{}: {}", self.origin, e)))?;

        let status = response.status();
        match status.as_u16() {
            401 | 403 => {
                return Err(StateError::Auth(format!(
                    "token rejected by {}",
                    self.base_url
                )));
            }
            404 => return Err(StateError::NotFound(what.to_string())),
            _ if !status.is_success() => {
                return Err(StateError::Network(format!(
                    "{}: unexpected status {} for {}",
                    self.origin, status, what
                )));
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| StateError::Network(format!("{}: {}", self.origin, e)))
    }
}

#[async_trait]
impl StateFetcher for RemoteFetcher {
    async fn fetch(&self) -> StateResult<RawState> {
        let workspace_id = self.lookup_workspace_id().await?;
        tracing::debug!(workspace_id, "resolved remote workspace");

        let url = self.state_download_url(&workspace_id).await?;
        let bytes = self.download(&url).await?;

        Ok(RawState::new(bytes, self.origin.clone()))
    }
}

/// Base URL for a backend hostname; `https` is assumed when no scheme is
/// given (tests point this at a plain-http mock server)
fn base_url(hostname: &str) -> String {
    let trimmed = hostname.trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
