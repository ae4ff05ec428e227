//! PolicyWeaver data model
//!
//! Three families of types live here:
//! - the source-agnostic policy export (catalog/schema/table permissions),
//! - the Fabric data access policy wire format,
//! - the `SourceMap` run configuration.
//!
//! Everything is plain serde data; behaviour lives in `policyweaver-core`.

mod export;
mod fabric;
mod source_map;

pub use export::*;
pub use fabric::*;
pub use source_map::*;
