//! Deterministic role names

use base64::{engine::general_purpose, Engine as _};
use policyweaver_model::Policy;

/// Namespace for roles created by PolicyWeaver
pub const ROLE_PREFIX: &str = "pw";

/// Derives role names from (policy type, catalog, schema, table).
///
/// The description `"<type>_<catalog>_<schema>_<table>"` is lowercased,
/// base64 encoded and stripped of `=` padding, then prefixed with
/// [`ROLE_PREFIX`]. Missing schema/table contribute an empty segment, so a
/// catalog-wide policy and a schema-wide policy never collide.
#[derive(Debug, Clone)]
pub struct RoleNameEncoder {
    policy_type: String,
}

impl RoleNameEncoder {
    pub fn new(policy_type: impl Into<String>) -> Self {
        Self {
            policy_type: policy_type.into(),
        }
    }

    pub fn encode(&self, catalog: &str, schema: Option<&str>, table: Option<&str>) -> String {
        let description = format!(
            "{}_{}_{}_{}",
            self.policy_type,
            catalog,
            schema.unwrap_or_default(),
            table.unwrap_or_default()
        )
        .to_lowercase();

        let encoded = general_purpose::STANDARD.encode(description.as_bytes());
        format!("{}{}", ROLE_PREFIX, encoded.trim_end_matches('='))
    }

    pub fn encode_policy(&self, policy: &Policy) -> String {
        self.encode(
            &policy.catalog,
            policy.catalog_schema.as_deref(),
            policy.table.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encoding() {
        let encoder = RoleNameEncoder::new("snowflake");
        assert_eq!(
            encoder.encode("sales", Some("public"), Some("orders")),
            "pwc25vd2ZsYWtlX3NhbGVzX3B1YmxpY19vcmRlcnM"
        );
    }

    #[test]
    fn test_padding_stripped() {
        let encoder = RoleNameEncoder::new("snowflake");

        // "snowflake_sales_public_" encodes with one '=' of padding
        let name = encoder.encode("sales", Some("public"), None);
        assert_eq!(name, "pwc25vd2ZsYWtlX3NhbGVzX3B1YmxpY18");
        assert!(!name.contains('='));
    }

    #[test]
    fn test_deterministic() {
        let a = RoleNameEncoder::new("snowflake");
        let b = RoleNameEncoder::new("snowflake");

        let first = a.encode("sales", Some("public"), Some("orders"));
        for _ in 0..10 {
            assert_eq!(a.encode("sales", Some("public"), Some("orders")), first);
        }
        assert_eq!(b.encode("sales", Some("public"), Some("orders")), first);
    }

    #[test]
    fn test_case_insensitive() {
        let encoder = RoleNameEncoder::new("Snowflake");
        assert_eq!(
            encoder.encode("SALES", Some("Public"), Some("ORDERS")),
            RoleNameEncoder::new("snowflake").encode("sales", Some("public"), Some("orders"))
        );
    }

    #[test]
    fn test_scope_levels_distinct() {
        let encoder = RoleNameEncoder::new("snowflake");

        let catalog = encoder.encode("sales", None, None);
        let schema = encoder.encode("sales", Some("public"), None);
        let table = encoder.encode("sales", Some("public"), Some("orders"));

        assert_ne!(catalog, schema);
        assert_ne!(schema, table);
        assert_ne!(catalog, table);
        assert!(catalog.starts_with(ROLE_PREFIX));
    }

    #[test]
    fn test_encode_policy_matches_encode() {
        let encoder = RoleNameEncoder::new("snowflake");
        let policy = Policy::new("sales", Some("public"), Some("orders"));

        assert_eq!(
            encoder.encode_policy(&policy),
            encoder.encode("sales", Some("public"), Some("orders"))
        );
    }
}
