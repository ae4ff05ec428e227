//! (action, state) → Fabric access type table

use policyweaver_model::{FabricPolicyAccessType, PermissionState, PermissionType};
use std::collections::HashMap;

/// Decides which source permissions become data access roles.
///
/// Only registered pairs produce a role; everything else (DENY states,
/// write actions) is skipped.
#[derive(Debug, Clone)]
pub struct AccessTypeTable {
    entries: HashMap<(PermissionType, PermissionState), FabricPolicyAccessType>,
}

impl AccessTypeTable {
    /// Table with no mappings; nothing will be published
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn register_builtins(&mut self) {
        // Readable grants
        self.register(
            PermissionType::Select,
            PermissionState::Grant,
            FabricPolicyAccessType::Read,
        );
    }

    /// Add or replace a mapping, returning the previous access type
    pub fn register(
        &mut self,
        action: PermissionType,
        state: PermissionState,
        access: FabricPolicyAccessType,
    ) -> Option<FabricPolicyAccessType> {
        self.entries.insert((action, state), access)
    }

    pub fn lookup(
        &self,
        action: PermissionType,
        state: PermissionState,
    ) -> Option<FabricPolicyAccessType> {
        self.entries.get(&(action, state)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AccessTypeTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register_builtins();
        table
    }
}
