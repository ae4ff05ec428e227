//! Source-agnostic policy export

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root input of a run: every policy exported from the source catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyExport {
    /// Tag of the system that produced the export (e.g. "unity_catalog").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,

    #[serde(default)]
    pub policies: Vec<Policy>,
}

impl PolicyExport {
    pub fn new(policies: Vec<Policy>) -> Self {
        Self {
            source_type: None,
            policies,
        }
    }

    /// Parse an export document from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Iterate every (policy, permission) pair in export order
    pub fn permissions(&self) -> impl Iterator<Item = (&Policy, &Permission)> {
        self.policies
            .iter()
            .flat_map(|policy| policy.permissions.iter().map(move |perm| (policy, perm)))
    }
}

/// Permissions scoped to a catalog, optionally narrowed to a schema and table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub catalog: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Policy {
    pub fn new(
        catalog: impl Into<String>,
        catalog_schema: Option<&str>,
        table: Option<&str>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            catalog_schema: catalog_schema.map(str::to_string),
            table: table.map(str::to_string),
            permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub name: PermissionType,
    pub state: PermissionState,

    #[serde(default)]
    pub objects: Vec<PrincipalRef>,
}

impl Permission {
    pub fn new(name: PermissionType, state: PermissionState, objects: Vec<PrincipalRef>) -> Self {
        Self {
            name,
            state,
            objects,
        }
    }

    /// Principals of type USER, in declaration order
    pub fn users(&self) -> impl Iterator<Item = &PrincipalRef> {
        self.objects.iter().filter(|o| o.kind == IamType::User)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionType {
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionType::Select => "SELECT",
            PermissionType::Insert => "INSERT",
            PermissionType::Update => "UPDATE",
            PermissionType::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionState {
    Grant,
    Deny,
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionState::Grant => f.write_str("GRANT"),
            PermissionState::Deny => f.write_str("DENY"),
        }
    }
}

/// Reference to an identity in the source system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRef {
    /// External identifier; for users this is the e-mail / UPN
    pub id: String,

    #[serde(rename = "type")]
    pub kind: IamType,
}

impl PrincipalRef {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: IamType::User,
        }
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: IamType::Group,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IamType {
    User,
    Group,
    ServicePrincipal,
}
