//! Data access policy construction

use policyweaver_model::{
    DataAccessPolicy, EntraMember, FabricMemberObjectType, FabricPolicyAccessType, IamType,
    Permission, Policy, PolicyDecisionRule, PolicyEffectType, PolicyExport, PolicyMembers,
    PolicyPermissionScope,
};
use tracing::debug;

use crate::access::AccessTypeTable;
use crate::error::WeaverError;
use crate::principal::ResolvedPrincipals;
use crate::role::RoleNameEncoder;
use crate::table::TableMapper;

/// PATH value for catalog- or schema-wide policies
pub const WILDCARD_PATH: &str = "*";

/// Builds one [`DataAccessPolicy`] per qualifying (policy, permission).
///
/// Pure construction: everything it needs is resolved up front and borrowed
/// for the lifetime of the builder.
pub struct AccessPolicyBuilder<'a> {
    roles: RoleNameEncoder,
    tables: TableMapper<'a>,
    access_types: &'a AccessTypeTable,
    principals: &'a ResolvedPrincipals,
    tenant_id: &'a str,
}

impl<'a> AccessPolicyBuilder<'a> {
    pub fn new(
        roles: RoleNameEncoder,
        tables: TableMapper<'a>,
        access_types: &'a AccessTypeTable,
        principals: &'a ResolvedPrincipals,
        tenant_id: &'a str,
    ) -> Self {
        Self {
            roles,
            tables,
            access_types,
            principals,
            tenant_id,
        }
    }

    /// Every policy for the export, in export order
    pub fn build_all(&self, export: &PolicyExport) -> Result<Vec<DataAccessPolicy>, WeaverError> {
        let mut policies = Vec::new();

        for (policy, permission) in export.permissions() {
            if let Some(dap) = self.build(policy, permission)? {
                policies.push(dap);
            }
        }

        Ok(policies)
    }

    /// `Ok(None)` when the permission has no mapped access type
    pub fn build(
        &self,
        policy: &Policy,
        permission: &Permission,
    ) -> Result<Option<DataAccessPolicy>, WeaverError> {
        match self.access_types.lookup(permission.name, permission.state) {
            Some(access) => self.build_with_access(policy, permission, access).map(Some),
            None => {
                debug!(
                    catalog = %policy.catalog,
                    action = %permission.name,
                    state = %permission.state,
                    "Skipping permission with no access type mapping"
                );
                Ok(None)
            }
        }
    }

    fn build_with_access(
        &self,
        policy: &Policy,
        permission: &Permission,
        access: FabricPolicyAccessType,
    ) -> Result<DataAccessPolicy, WeaverError> {
        let name = self.roles.encode_policy(policy);

        let path = self
            .tables
            .table_path(
                &policy.catalog,
                policy.catalog_schema.as_deref(),
                policy.table.as_deref(),
            )
            .unwrap_or_else(|| WILDCARD_PATH.to_string());

        Ok(DataAccessPolicy {
            id: None,
            name,
            decision_rules: vec![PolicyDecisionRule {
                effect: PolicyEffectType::Permit,
                permission: vec![
                    PolicyPermissionScope::path(vec![path]),
                    PolicyPermissionScope::action(vec![access.to_string()]),
                ],
            }],
            members: PolicyMembers {
                entra_members: self.members(permission)?,
            },
        })
    }

    fn members(&self, permission: &Permission) -> Result<Vec<EntraMember>, WeaverError> {
        let skipped = permission
            .objects
            .iter()
            .filter(|o| o.kind != IamType::User)
            .count();
        if skipped > 0 {
            // Groups and service principals need their own lookups first
            debug!(skipped, "Excluding non-user principals from role membership");
        }

        permission
            .users()
            .map(|user| {
                Ok(EntraMember {
                    object_id: self.principals.require(&user.id)?.to_string(),
                    tenant_id: self.tenant_id.to_string(),
                    object_type: FabricMemberObjectType::User,
                })
            })
            .collect()
    }
}
