//! Fabric REST API: workspace/lakehouse lookups and data access policies

use async_trait::async_trait;
use policyweaver_core::api::{ClientError, PlatformApi};
use policyweaver_model::{DataAccessPolicyRequest, FabricConfig};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::http;

pub const DEFAULT_FABRIC_URL: &str = "https://api.fabric.microsoft.com/v1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Workspace {
    display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    id: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemPage {
    #[serde(default)]
    value: Vec<Item>,
    #[serde(default)]
    continuation_token: Option<String>,
}

fn find_item<'a>(items: &'a [Item], display_name: &str) -> Option<&'a Item> {
    items.iter().find(|item| item.display_name == display_name)
}

pub struct FabricClient {
    http: Client,
    base_url: String,
    api_token: String,
}

impl FabricClient {
    pub fn new(api_token: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            http: http::client(http::DEFAULT_TIMEOUT)?,
            base_url: DEFAULT_FABRIC_URL.to_string(),
            api_token: api_token.into(),
        })
    }

    pub fn from_config(config: &FabricConfig) -> Result<Self, ClientError> {
        Self::new(config.api_token.as_str())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        http::join_segments(&self.base_url, segments)
    }

    fn lakehouses_url(
        &self,
        workspace_id: &str,
        continuation: Option<&str>,
    ) -> Result<Url, ClientError> {
        let mut url = self.url(&["workspaces", workspace_id, "lakehouses"])?;
        if let Some(token) = continuation {
            url.query_pairs_mut().append_pair("continuationToken", token);
        }
        Ok(url)
    }

    fn policies_url(&self, workspace_id: &str, lakehouse_id: &str) -> Result<Url, ClientError> {
        self.url(&["workspaces", workspace_id, "items", lakehouse_id, "dataAccessPolicies"])
    }
}

#[async_trait]
impl PlatformApi for FabricClient {
    async fn lakehouse_id(
        &self,
        workspace_id: &str,
        lakehouse_name: &str,
    ) -> Result<String, ClientError> {
        let mut continuation: Option<String> = None;

        loop {
            let url = self.lakehouses_url(workspace_id, continuation.as_deref())?;
            let page: ItemPage =
                http::send_json(self.http.get(url).bearer_auth(&self.api_token)).await?;

            if let Some(item) = find_item(&page.value, lakehouse_name) {
                debug!(lakehouse = lakehouse_name, id = %item.id, "Resolved lakehouse");
                return Ok(item.id.clone());
            }

            match page.continuation_token {
                Some(token) if !token.is_empty() => continuation = Some(token),
                _ => break,
            }
        }

        Err(ClientError::NotFound(format!(
            "lakehouse '{}' in workspace {}",
            lakehouse_name, workspace_id
        )))
    }

    async fn workspace_name(&self, workspace_id: &str) -> Result<String, ClientError> {
        let url = self.url(&["workspaces", workspace_id])?;
        let workspace: Workspace =
            http::send_json(self.http.get(url).bearer_auth(&self.api_token)).await?;
        Ok(workspace.display_name)
    }

    async fn put_data_access_policies(
        &self,
        workspace_id: &str,
        lakehouse_id: &str,
        request: &DataAccessPolicyRequest,
    ) -> Result<(), ClientError> {
        let url = self.policies_url(workspace_id, lakehouse_id)?;
        info!(
            workspace_id,
            lakehouse_id,
            roles = request.len(),
            "Publishing data access policies"
        );

        http::send_empty(
            self.http
                .put(url)
                .bearer_auth(&self.api_token)
                .json(request),
        )
        .await
    }
}
