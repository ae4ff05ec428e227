//! Principal resolution
//!
//! Collects every USER principal referenced by an export and resolves each
//! distinct id exactly once through an [`IdentityLookup`]. Lookups run
//! concurrently, bounded by a semaphore; the first failure cancels the rest.

use policyweaver_model::PolicyExport;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::api::IdentityLookup;
use crate::error::WeaverError;

/// External id → Entra object id, built once per run and read-only after
#[derive(Debug, Clone, Default)]
pub struct ResolvedPrincipals {
    ids: HashMap<String, String>,
}

impl ResolvedPrincipals {
    pub fn get(&self, external_id: &str) -> Option<&str> {
        self.ids.get(external_id).map(String::as_str)
    }

    /// Like [`get`](Self::get), but a missing id is a resolution error
    pub fn require(&self, external_id: &str) -> Result<&str, WeaverError> {
        self.get(external_id)
            .ok_or_else(|| WeaverError::unresolved(external_id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<(String, String)> for ResolvedPrincipals {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Distinct USER ids referenced anywhere in the export.
///
/// Groups and service principals are not resolved yet.
pub fn collect_user_ids(export: &PolicyExport) -> BTreeSet<String> {
    export
        .permissions()
        .flat_map(|(_, permission)| permission.users())
        .map(|principal| principal.id.clone())
        .collect()
}

pub struct PrincipalResolver {
    lookup: Arc<dyn IdentityLookup>,
    max_concurrent: usize,
}

impl PrincipalResolver {
    pub fn new(lookup: Arc<dyn IdentityLookup>, max_concurrent: usize) -> Self {
        Self {
            lookup,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub async fn resolve(&self, export: &PolicyExport) -> Result<ResolvedPrincipals, WeaverError> {
        let ids = collect_user_ids(export);
        debug!(
            principals = ids.len(),
            max_concurrent = self.max_concurrent,
            "Resolving user principals"
        );

        let permits = Arc::new(Semaphore::new(self.max_concurrent));
        let mut lookups = JoinSet::new();

        for id in ids {
            let lookup = Arc::clone(&self.lookup);
            let permits = Arc::clone(&permits);
            lookups.spawn(async move {
                // The semaphore is never closed
                let _permit = permits.acquire_owned().await;
                let result = lookup.lookup_user_id(&id).await;
                (id, result)
            });
        }

        let mut resolved = HashMap::with_capacity(lookups.len());

        // Returning early drops the JoinSet, which aborts outstanding lookups
        while let Some(joined) = lookups.join_next().await {
            let (id, result) = joined.map_err(|e| WeaverError::PrincipalResolution {
                id: "<unknown>".to_string(),
                reason: format!("lookup task failed: {}", e),
            })?;

            let object_id = result.map_err(|e| WeaverError::PrincipalResolution {
                id: id.clone(),
                reason: e.to_string(),
            })?;

            debug!(principal = %id, object_id = %object_id, "Resolved principal");
            resolved.insert(id, object_id);
        }

        Ok(ResolvedPrincipals { ids: resolved })
    }
}
