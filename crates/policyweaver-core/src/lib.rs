//! PolicyWeaver core
//!
//! Translates a source-agnostic policy export into Fabric OneLake data
//! access roles:
//! - role names derived deterministically from policy coordinates
//! - table paths resolved through optional rename overrides
//! - user principals resolved to Entra object ids, once per id per run
//! - one `DataAccessPolicy` per readable grant, published as a full set

pub mod access;
pub mod api;
pub mod builder;
mod error;
pub mod principal;
pub mod role;
pub mod table;
pub mod weaver;

pub use error::WeaverError;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::access::AccessTypeTable;
    pub use crate::api::{ClientError, IdentityLookup, PlatformApi};
    pub use crate::builder::AccessPolicyBuilder;
    pub use crate::principal::{PrincipalResolver, ResolvedPrincipals};
    pub use crate::role::RoleNameEncoder;
    pub use crate::table::TableMapper;
    pub use crate::weaver::{PlatformTarget, RunReport, WeavePlan, Weaver};
    pub use crate::WeaverError;
}
