//! Microsoft Graph identity lookups

use async_trait::async_trait;
use policyweaver_core::api::{ClientError, IdentityLookup};
use policyweaver_model::ServicePrincipalConfig;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

use crate::http;

pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Tokens are refreshed this long before Entra says they expire
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_SKEW < self.expires_at
    }
}

/// Resolves user e-mails / UPNs to Entra object ids using an app-only
/// (client credentials) token.
pub struct GraphClient {
    http: Client,
    authority: String,
    graph_url: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl GraphClient {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http: http::client(http::DEFAULT_TIMEOUT)?,
            authority: DEFAULT_AUTHORITY.to_string(),
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: Mutex::new(None),
        })
    }

    pub fn from_config(config: &ServicePrincipalConfig) -> Result<Self, ClientError> {
        Self::new(
            config.tenant_id.as_str(),
            config.client_id.as_str(),
            config.client_secret.as_str(),
        )
    }

    /// Point at a different login authority / Graph endpoint (sovereign clouds)
    pub fn with_endpoints(mut self, authority: impl Into<String>, graph_url: impl Into<String>) -> Self {
        self.authority = authority.into();
        self.graph_url = graph_url.into();
        self
    }

    fn token_url(&self) -> Result<Url, ClientError> {
        http::join_segments(&self.authority, &[self.tenant_id.as_str(), "oauth2", "v2.0", "token"])
    }

    fn user_url(&self, external_id: &str) -> Result<Url, ClientError> {
        let mut url = http::join_segments(&self.graph_url, &["users", external_id])?;
        url.query_pairs_mut().append_pair("$select", "id");
        Ok(url)
    }

    async fn access_token(&self) -> Result<String, ClientError> {
        // Held across the fetch so concurrent lookups share one token request
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        debug!(tenant = %self.tenant_id, "Requesting Graph access token");
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];
        let response: TokenResponse = http::send_json(self.http.post(self.token_url()?).form(&form))
            .await
            .map_err(|e| ClientError::Auth(e.to_string()))?;

        let token = CachedToken {
            value: response.access_token,
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        };
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}

#[async_trait]
impl IdentityLookup for GraphClient {
    async fn lookup_user_id(&self, external_id: &str) -> Result<String, ClientError> {
        let token = self.access_token().await?;
        let url = self.user_url(external_id)?;

        let user: UserResponse = http::send_json(self.http.get(url).bearer_auth(token))
            .await
            .map_err(|e| match e {
                ClientError::NotFound(_) => ClientError::NotFound(format!("user '{}'", external_id)),
                other => other,
            })?;

        Ok(user.id)
    }
}
