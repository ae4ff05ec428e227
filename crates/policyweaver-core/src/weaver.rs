//! Run orchestration
//!
//! A run is linear:
//! 1. resolve principals
//! 2. resolve platform identifiers (lakehouse id, workspace name)
//! 3. build the policy set
//! 4. publish it as a full replacement
//!
//! All per-run state lives in locals of [`Weaver::plan`] / [`Weaver::run`],
//! so one `Weaver` can serve overlapping runs.

use policyweaver_model::{DataAccessPolicy, DataAccessPolicyRequest, PolicyExport, SourceMap};
use std::sync::Arc;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::access::AccessTypeTable;
use crate::api::{IdentityLookup, PlatformApi};
use crate::builder::AccessPolicyBuilder;
use crate::error::WeaverError;
use crate::principal::{PrincipalResolver, ResolvedPrincipals};
use crate::role::RoleNameEncoder;
use crate::table::TableMapper;

/// Where the policies are published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTarget {
    pub workspace_id: String,
    pub workspace_name: String,
    pub lakehouse_id: String,
}

/// Everything a publish needs, computed without side effects on the platform
#[derive(Debug, Clone)]
pub struct WeavePlan {
    pub run_id: Uuid,
    pub target: PlatformTarget,
    pub principals: ResolvedPrincipals,
    pub policies: Vec<DataAccessPolicy>,
}

impl WeavePlan {
    pub fn request(&self) -> DataAccessPolicyRequest {
        DataAccessPolicyRequest::new(self.policies.clone())
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub target: PlatformTarget,
    pub principals_resolved: usize,
    pub policies_published: usize,
}

pub struct Weaver {
    config: SourceMap,
    identities: Arc<dyn IdentityLookup>,
    platform: Arc<dyn PlatformApi>,
    access_types: AccessTypeTable,
}

impl Weaver {
    pub fn new(
        config: SourceMap,
        identities: Arc<dyn IdentityLookup>,
        platform: Arc<dyn PlatformApi>,
    ) -> Self {
        Self {
            config,
            identities,
            platform,
            access_types: AccessTypeTable::default(),
        }
    }

    pub fn with_access_types(mut self, access_types: AccessTypeTable) -> Self {
        self.access_types = access_types;
        self
    }

    /// Phases 1-3: resolve and build, but publish nothing
    pub async fn plan(&self, export: &PolicyExport) -> Result<WeavePlan, WeaverError> {
        let (run_id, span) = self.run_span();
        self.plan_with_id(run_id, export).instrument(span).await
    }

    /// Full run: plan, then publish the policy set as one batch
    pub async fn run(&self, export: &PolicyExport) -> Result<RunReport, WeaverError> {
        let (run_id, span) = self.run_span();

        async move {
            let plan = self.plan_with_id(run_id, export).await?;
            self.publish(&plan).await?;

            let report = RunReport {
                run_id,
                target: plan.target,
                principals_resolved: plan.principals.len(),
                policies_published: plan.policies.len(),
            };
            info!(
                policies = report.policies_published,
                principals = report.principals_resolved,
                lakehouse_id = %report.target.lakehouse_id,
                "Access policies updated"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Fresh run id and the `weave` span every event of the run lives in
    fn run_span(&self) -> (Uuid, tracing::Span) {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("weave", %run_id, policy_type = %self.config.policy_type);
        (run_id, span)
    }

    async fn plan_with_id(
        &self,
        run_id: Uuid,
        export: &PolicyExport,
    ) -> Result<WeavePlan, WeaverError> {
        info!(policies = export.policies.len(), "Starting policy run");

        let resolver = PrincipalResolver::new(
            Arc::clone(&self.identities),
            self.config.max_concurrent_lookups,
        );
        let principals = resolver.resolve(export).await?;
        info!(principals = principals.len(), "Principals resolved");

        let target = self.resolve_platform_target().await?;
        info!(
            workspace = %target.workspace_name,
            lakehouse_id = %target.lakehouse_id,
            "Platform identifiers resolved"
        );

        let policies = self.build_policies(export, &principals)?;
        info!(count = policies.len(), "Access policies built");

        Ok(WeavePlan {
            run_id,
            target,
            principals,
            policies,
        })
    }

    async fn resolve_platform_target(&self) -> Result<PlatformTarget, WeaverError> {
        let fabric = &self.config.fabric;
        if fabric.workspace_id.is_empty() {
            return Err(WeaverError::Configuration(
                "fabric.workspace_id is required".to_string(),
            ));
        }

        let lakehouse_id = match (&fabric.lakehouse_id, &fabric.lakehouse_name) {
            (Some(id), _) => id.clone(),
            (None, Some(name)) => self
                .platform
                .lakehouse_id(&fabric.workspace_id, name)
                .await
                .map_err(|source| WeaverError::PlatformIdentifier {
                    identifier: "lakehouse id",
                    source,
                })?,
            (None, None) => {
                return Err(WeaverError::Configuration(
                    "either fabric.lakehouse_id or fabric.lakehouse_name must be set".to_string(),
                ))
            }
        };

        let workspace_name = match &fabric.workspace_name {
            Some(name) => name.clone(),
            None => self
                .platform
                .workspace_name(&fabric.workspace_id)
                .await
                .map_err(|source| WeaverError::PlatformIdentifier {
                    identifier: "workspace name",
                    source,
                })?,
        };

        Ok(PlatformTarget {
            workspace_id: fabric.workspace_id.clone(),
            workspace_name,
            lakehouse_id,
        })
    }

    fn build_policies(
        &self,
        export: &PolicyExport,
        principals: &ResolvedPrincipals,
    ) -> Result<Vec<DataAccessPolicy>, WeaverError> {
        let builder = AccessPolicyBuilder::new(
            RoleNameEncoder::new(self.config.policy_type.as_str()),
            TableMapper::new(&self.config.mapped_items),
            &self.access_types,
            principals,
            &self.config.service_principal.tenant_id,
        );
        builder.build_all(export)
    }

    async fn publish(&self, plan: &WeavePlan) -> Result<(), WeaverError> {
        let request = plan.request();
        self.platform
            .put_data_access_policies(
                &plan.target.workspace_id,
                &plan.target.lakehouse_id,
                &request,
            )
            .await
            .map_err(WeaverError::Publish)
    }
}
