//! Fabric OneLake data access policy wire format
//!
//! Field names follow the `dataAccessPolicies` REST payload (camelCase);
//! unset optional fields are omitted when serializing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of the full-replace publish call: `{"value": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataAccessPolicyRequest {
    pub value: Vec<DataAccessPolicy>,
}

impl DataAccessPolicyRequest {
    pub fn new(value: Vec<DataAccessPolicy>) -> Self {
        Self { value }
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// A OneLake data access role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAccessPolicy {
    /// Assigned by Fabric; never sent on publish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    pub decision_rules: Vec<PolicyDecisionRule>,

    pub members: PolicyMembers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecisionRule {
    pub effect: PolicyEffectType,
    pub permission: Vec<PolicyPermissionScope>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyEffectType {
    Permit,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyPermissionScope {
    pub attribute_name: PolicyAttributeType,
    pub attribute_value_included_in: Vec<String>,
}

impl PolicyPermissionScope {
    pub fn path(values: Vec<String>) -> Self {
        Self {
            attribute_name: PolicyAttributeType::Path,
            attribute_value_included_in: values,
        }
    }

    pub fn action(values: Vec<String>) -> Self {
        Self {
            attribute_name: PolicyAttributeType::Action,
            attribute_value_included_in: values,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyAttributeType {
    Path,
    Action,
}

/// Access granted by an ACTION scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FabricPolicyAccessType {
    Read,
    ReadAll,
}

impl FabricPolicyAccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FabricPolicyAccessType::Read => "Read",
            FabricPolicyAccessType::ReadAll => "ReadAll",
        }
    }
}

impl fmt::Display for FabricPolicyAccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyMembers {
    #[serde(default)]
    pub entra_members: Vec<EntraMember>,
}

/// A Microsoft Entra identity bound to a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntraMember {
    pub object_id: String,
    pub tenant_id: String,
    pub object_type: FabricMemberObjectType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FabricMemberObjectType {
    Group,
    User,
    ServicePrincipal,
    ManagedIdentity,
}
