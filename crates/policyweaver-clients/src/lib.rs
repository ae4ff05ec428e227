//! HTTP collaborators for PolicyWeaver runs
//!
//! - [`GraphClient`]: Microsoft Graph user lookups (app-only token)
//! - [`FabricClient`]: Fabric workspace/lakehouse lookups and data access
//!   policy publishing

mod fabric;
mod graph;
mod http;

pub use fabric::{FabricClient, DEFAULT_FABRIC_URL};
pub use graph::{GraphClient, DEFAULT_AUTHORITY, DEFAULT_GRAPH_URL};
pub use http::DEFAULT_TIMEOUT;
