//! Collaborator seams: identity provider and data-platform management API
//!
//! `policyweaver-clients` provides HTTP implementations; tests use in-memory
//! ones.

use async_trait::async_trait;
use policyweaver_model::DataAccessPolicyRequest;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request failed ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Resolves external user identifiers to Entra object ids
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn lookup_user_id(&self, external_id: &str) -> Result<String, ClientError>;
}

/// Fabric management API surface used by a run
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Id of the lakehouse named `lakehouse_name` in the workspace
    async fn lakehouse_id(&self, workspace_id: &str, lakehouse_name: &str)
        -> Result<String, ClientError>;

    async fn workspace_name(&self, workspace_id: &str) -> Result<String, ClientError>;

    /// Replace every data access role on the lakehouse with `request`
    async fn put_data_access_policies(
        &self,
        workspace_id: &str,
        lakehouse_id: &str,
        request: &DataAccessPolicyRequest,
    ) -> Result<(), ClientError>;
}
