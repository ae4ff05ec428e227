//! Run configuration: where policies come from and where they go

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

fn default_max_concurrent_lookups() -> usize {
    DEFAULT_MAX_CONCURRENT_LOOKUPS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMap {
    /// Policy type tag, folded into every role name
    #[serde(rename = "type")]
    pub policy_type: String,

    pub fabric: FabricConfig,

    pub service_principal: ServicePrincipalConfig,

    /// Explicit source table → lakehouse table renames
    #[serde(default)]
    pub mapped_items: Vec<MappedItem>,

    /// Upper bound on in-flight identity lookups
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FabricConfig {
    #[serde(default)]
    pub workspace_id: String,

    /// Resolved from the workspace when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,

    /// Resolved from `lakehouse_name` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lakehouse_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lakehouse_name: Option<String>,

    #[serde(default, skip_serializing)]
    pub api_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicePrincipalConfig {
    #[serde(default)]
    pub tenant_id: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default, skip_serializing)]
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedItem {
    pub catalog: String,

    #[serde(default)]
    pub catalog_schema: Option<String>,

    pub table: String,

    pub lakehouse_table_name: String,
}

impl MappedItem {
    pub fn matches(&self, catalog: &str, schema: Option<&str>, table: &str) -> bool {
        self.catalog == catalog && self.catalog_schema.as_deref() == schema && self.table == table
    }
}
